#![warn(missing_docs)]
//! `diag-lens-lsp` - LSP integration for `diag-lens`.
//!
//! This crate connects a lens to a language server: JSON-RPC stdio framing, a small threaded
//! client, `textDocument/publishDiagnostics` parsing, and an [`LspLensHost`] that turns pushed
//! diagnostics into [`diag_lens::LensEvent`]s for a [`diag_lens::PresentationDriver`].
//!
//! The API uses `serde_json::Value` rather than `lsp-types` to keep the dependency surface small.

pub mod lsp_client;
pub mod lsp_diagnostics;
pub mod lsp_host;
pub mod lsp_transport;
pub mod session;

pub use lsp_client::{LspClient, LspInbound, MessageKind};
pub use lsp_diagnostics::{
    LspDiagnostic, LspDiagnosticSeverity, LspPosition, LspRange, PUBLISH_DIAGNOSTICS,
    PublishDiagnosticsParams,
};
pub use lsp_host::LspLensHost;
pub use lsp_transport::{read_lsp_message, write_lsp_message};
pub use session::{LspLensSession, LspLensSessionOptions, default_initialize_params};
