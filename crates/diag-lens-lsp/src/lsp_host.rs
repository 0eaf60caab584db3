//! A [`LensHost`] fed by language-server notifications.

use crate::lsp_client::MessageKind;
use crate::lsp_diagnostics::{PUBLISH_DIAGNOSTICS, PublishDiagnosticsParams};
use diag_lens::{Diagnostic, DiagnosticStore, DocumentUri, LensEvent, LensHost};
use serde_json::Value;

/// Lens host backed by a [`DiagnosticStore`] that is updated from `publishDiagnostics`.
#[derive(Debug, Clone, Default)]
pub struct LspLensHost {
    store: DiagnosticStore,
}

impl LspLensHost {
    /// Create an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// The underlying store (open documents, active document, diagnostics).
    pub fn store(&self) -> &DiagnosticStore {
        &self.store
    }

    /// Mutable access to the underlying store.
    pub fn store_mut(&mut self) -> &mut DiagnosticStore {
        &mut self.store
    }

    /// Apply a server notification.
    ///
    /// Returns the event to dispatch to the driver, or `None` for notifications the lens does
    /// not care about (and for malformed `publishDiagnostics` params).
    pub fn apply_notification(&mut self, method: &str, params: &Value) -> Option<LensEvent> {
        if method != PUBLISH_DIAGNOSTICS {
            return None;
        }
        let Some(params) = PublishDiagnosticsParams::from_params(params) else {
            log::warn!("ignoring malformed {PUBLISH_DIAGNOSTICS} params");
            return None;
        };
        log::debug!(
            "{} diagnostics for {} (version {:?})",
            params.diagnostics.len(),
            params.uri,
            params.version
        );
        Some(self.store.publish(params.document_uri(), params.to_diagnostics()))
    }

    /// Apply a raw JSON-RPC message. Requests and responses are ignored.
    pub fn apply_message(&mut self, msg: &Value) -> Option<LensEvent> {
        if MessageKind::of(msg) != MessageKind::Notification {
            return None;
        }
        let method = msg.get("method")?.as_str()?;
        let params = msg.get("params").unwrap_or(&Value::Null);
        self.apply_notification(method, params)
    }
}

impl LensHost for LspLensHost {
    fn active_document(&self) -> Option<DocumentUri> {
        self.store.active_document()
    }

    fn diagnostics(&self, uri: &DocumentUri) -> Vec<Diagnostic> {
        self.store.diagnostics(uri)
    }
}
