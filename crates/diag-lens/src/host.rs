//! Host seams.
//!
//! The lens is UI-agnostic. A host (editor, language client, test harness) supplies:
//! - a [`LensHost`]: the active document and a per-document diagnostics query
//! - a [`PanelRenderer`]: the render target for [`PanelView`]s
//!
//! and feeds [`LensEvent`]s into
//! [`PresentationDriver::handle`](crate::PresentationDriver::handle).

use crate::diagnostics::Diagnostic;
use crate::uri::DocumentUri;
use crate::view::PanelView;

/// Read access to the host's editor and diagnostic state.
pub trait LensHost {
    /// The document in the focused editor, if any.
    ///
    /// Called fresh at the start of every handler; implementations must not cache it.
    fn active_document(&self) -> Option<DocumentUri>;

    /// All current diagnostics for exactly `uri` (never other documents).
    fn diagnostics(&self, uri: &DocumentUri) -> Vec<Diagnostic>;
}

impl<T: LensHost + ?Sized> LensHost for &T {
    fn active_document(&self) -> Option<DocumentUri> {
        (**self).active_document()
    }

    fn diagnostics(&self, uri: &DocumentUri) -> Vec<Diagnostic> {
        (**self).diagnostics(uri)
    }
}

/// A render target for the lens panel.
pub trait PanelRenderer {
    /// Replace the panel contents with `view`.
    fn render(&mut self, view: &PanelView);
}

impl<F> PanelRenderer for F
where
    F: FnMut(&PanelView),
{
    fn render(&mut self, view: &PanelView) {
        self(view)
    }
}

/// Events that make the driver re-evaluate the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LensEvent {
    /// Periodic refresh.
    Tick,
    /// Diagnostics changed for the listed documents.
    DiagnosticsChanged(Vec<DocumentUri>),
    /// The focused editor changed (`None` when no editor is focused).
    ActiveDocumentChanged(Option<DocumentUri>),
    /// A document was opened.
    DocumentOpened(DocumentUri),
    /// The user enabled the lens.
    Enable,
    /// The user disabled the lens.
    Disable,
}
