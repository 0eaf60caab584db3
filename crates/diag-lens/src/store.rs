//! In-memory diagnostic store.
//!
//! [`DiagnosticStore`] is a ready-made [`LensHost`] for hosts that receive diagnostics as pushed
//! snapshots (language servers, batch linters) rather than owning a queryable diagnostic
//! collection. It tracks open documents and the focused one.

use crate::diagnostics::Diagnostic;
use crate::host::{LensEvent, LensHost};
use crate::uri::DocumentUri;
use std::collections::HashMap;

/// Per-document diagnostics plus open/active document tracking.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticStore {
    diagnostics: HashMap<DocumentUri, Vec<Diagnostic>>,
    open: Vec<DocumentUri>,
    active: Option<DocumentUri>,
}

impl DiagnosticStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the diagnostics of `uri` with `diagnostics`.
    ///
    /// Returns the [`LensEvent::DiagnosticsChanged`] to dispatch. An empty list removes the
    /// document's entry.
    pub fn publish(&mut self, uri: DocumentUri, diagnostics: Vec<Diagnostic>) -> LensEvent {
        if diagnostics.is_empty() {
            self.diagnostics.remove(&uri);
        } else {
            self.diagnostics.insert(uri.clone(), diagnostics);
        }
        LensEvent::DiagnosticsChanged(vec![uri])
    }

    /// Remove all diagnostics of `uri`.
    pub fn clear(&mut self, uri: &DocumentUri) -> LensEvent {
        self.diagnostics.remove(uri);
        LensEvent::DiagnosticsChanged(vec![uri.clone()])
    }

    /// Number of documents with at least one diagnostic.
    pub fn document_count(&self) -> usize {
        self.diagnostics.len()
    }

    /// Record `uri` as open. The first opened document becomes active.
    pub fn open(&mut self, uri: DocumentUri) -> LensEvent {
        if !self.open.contains(&uri) {
            self.open.push(uri.clone());
        }
        if self.active.is_none() {
            self.active = Some(uri.clone());
        }
        LensEvent::DocumentOpened(uri)
    }

    /// Forget `uri` as an open document. Closing the active document leaves nothing focused.
    ///
    /// Diagnostics are kept: servers may keep publishing for closed files.
    pub fn close(&mut self, uri: &DocumentUri) -> Option<LensEvent> {
        let before = self.open.len();
        self.open.retain(|u| u != uri);
        if self.open.len() == before {
            return None;
        }
        if self.active.as_ref() == Some(uri) {
            self.active = None;
            return Some(LensEvent::ActiveDocumentChanged(None));
        }
        None
    }

    /// Open documents in the order they were opened.
    pub fn open_documents(&self) -> &[DocumentUri] {
        &self.open
    }

    /// Focus `uri` (or nothing).
    pub fn set_active(&mut self, uri: Option<DocumentUri>) -> LensEvent {
        self.active = uri.clone();
        LensEvent::ActiveDocumentChanged(uri)
    }

    /// Focus the open document after the active one, wrapping around.
    pub fn cycle_active(&mut self) -> Option<LensEvent> {
        if self.open.is_empty() {
            return None;
        }
        let next = match self
            .active
            .as_ref()
            .and_then(|a| self.open.iter().position(|u| u == a))
        {
            Some(idx) => (idx + 1) % self.open.len(),
            None => 0,
        };
        Some(self.set_active(Some(self.open[next].clone())))
    }
}

impl LensHost for DiagnosticStore {
    fn active_document(&self) -> Option<DocumentUri> {
        self.active.clone()
    }

    fn diagnostics(&self, uri: &DocumentUri) -> Vec<Diagnostic> {
        self.diagnostics.get(uri).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostic;

    #[test]
    fn test_publish_is_scoped_per_document() {
        let a = DocumentUri::parse("file:///a.rs");
        let b = DocumentUri::parse("file:///b.rs");
        let mut store = DiagnosticStore::new();

        let event = store.publish(b.clone(), vec![Diagnostic::error(0, "x")]);
        assert_eq!(event, LensEvent::DiagnosticsChanged(vec![b.clone()]));
        assert!(store.diagnostics(&a).is_empty());
        assert_eq!(store.diagnostics(&b).len(), 1);

        store.publish(b.clone(), Vec::new());
        assert_eq!(store.document_count(), 0);
    }

    #[test]
    fn test_open_close_and_cycle() {
        let a = DocumentUri::parse("file:///a.rs");
        let b = DocumentUri::parse("file:///b.rs");
        let mut store = DiagnosticStore::new();

        store.open(a.clone());
        store.open(b.clone());
        store.open(a.clone());
        assert_eq!(store.open_documents(), &[a.clone(), b.clone()]);
        assert_eq!(store.active_document(), Some(a.clone()));

        assert_eq!(
            store.cycle_active(),
            Some(LensEvent::ActiveDocumentChanged(Some(b.clone())))
        );
        assert_eq!(
            store.cycle_active(),
            Some(LensEvent::ActiveDocumentChanged(Some(a.clone())))
        );

        assert_eq!(
            store.close(&a),
            Some(LensEvent::ActiveDocumentChanged(None))
        );
        assert_eq!(store.active_document(), None);
        assert_eq!(store.close(&a), None);
    }
}
