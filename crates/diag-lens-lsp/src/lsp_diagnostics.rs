//! `textDocument/publishDiagnostics` parsing.
//!
//! Servers push the complete diagnostic set of a document on every change. These types keep the
//! LSP shape (zero-based line/character ranges, numeric severities) and convert into
//! [`diag_lens::Diagnostic`] for the lens.

use diag_lens::{Diagnostic, DiagnosticSeverity, DocumentUri};
use serde_json::Value;

/// Method name of the diagnostics notification.
pub const PUBLISH_DIAGNOSTICS: &str = "textDocument/publishDiagnostics";

/// LSP position (zero-based line, UTF-16 character).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LspPosition {
    /// Zero-based line.
    pub line: u32,
    /// Zero-based character offset (UTF-16 code units).
    pub character: u32,
}

/// LSP range (`start..end`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LspRange {
    /// Range start.
    pub start: LspPosition,
    /// Range end.
    pub end: LspPosition,
}

/// Severity levels for `textDocument/publishDiagnostics`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LspDiagnosticSeverity {
    /// `1`
    Error,
    /// `2`
    Warning,
    /// `3`
    Information,
    /// `4`
    Hint,
}

impl LspDiagnosticSeverity {
    /// Convert the numeric LSP `DiagnosticSeverity` into an enum.
    pub fn from_u64(value: u64) -> Option<Self> {
        match value {
            1 => Some(Self::Error),
            2 => Some(Self::Warning),
            3 => Some(Self::Information),
            4 => Some(Self::Hint),
            _ => None,
        }
    }
}

impl From<LspDiagnosticSeverity> for DiagnosticSeverity {
    fn from(value: LspDiagnosticSeverity) -> Self {
        match value {
            LspDiagnosticSeverity::Error => Self::Error,
            LspDiagnosticSeverity::Warning => Self::Warning,
            LspDiagnosticSeverity::Information => Self::Information,
            LspDiagnosticSeverity::Hint => Self::Hint,
        }
    }
}

/// A single LSP diagnostic item.
#[derive(Debug, Clone, PartialEq)]
pub struct LspDiagnostic {
    /// Diagnostic range.
    pub range: LspRange,
    /// Severity, if the server sent one.
    pub severity: Option<LspDiagnosticSeverity>,
    /// Diagnostic code (number or string), stringified.
    pub code: Option<String>,
    /// Diagnostic source (e.g. `"rustc"`).
    pub source: Option<String>,
    /// Diagnostic message.
    pub message: String,
}

impl LspDiagnostic {
    /// Parse one item of the `diagnostics` array. Items without a valid range are rejected.
    pub fn from_value(value: &Value) -> Option<Self> {
        let range = lsp_range_from_value(value.get("range")?)?;
        let severity = value
            .get("severity")
            .and_then(Value::as_u64)
            .and_then(LspDiagnosticSeverity::from_u64);
        let code = value.get("code").and_then(|code| match code {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });
        let source = value
            .get("source")
            .and_then(Value::as_str)
            .map(str::to_string);
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();

        Some(Self {
            range,
            severity,
            code,
            source,
            message,
        })
    }

    /// Convert into a lens diagnostic keyed by the range's start line.
    ///
    /// A missing severity is shown as an error, matching how editor clients display untyped
    /// server diagnostics.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let severity = self
            .severity
            .map(DiagnosticSeverity::from)
            .unwrap_or(DiagnosticSeverity::Error);
        Diagnostic {
            line: self.range.start.line,
            severity,
            message: self.message.clone(),
            source: self.source.clone(),
            code: self.code.clone(),
        }
    }
}

/// Parameters of `textDocument/publishDiagnostics`.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishDiagnosticsParams {
    /// Document URI as sent by the server.
    pub uri: String,
    /// Optional document version.
    pub version: Option<i32>,
    /// The full diagnostic set for the document.
    pub diagnostics: Vec<LspDiagnostic>,
}

impl PublishDiagnosticsParams {
    /// Parse the notification `params`. Returns `None` if `uri` is missing.
    pub fn from_params(params: &Value) -> Option<Self> {
        let uri = params.get("uri")?.as_str()?.to_string();
        let version = params
            .get("version")
            .and_then(Value::as_i64)
            .and_then(|v| i32::try_from(v).ok());
        let diagnostics = params
            .get("diagnostics")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(LspDiagnostic::from_value).collect())
            .unwrap_or_default();

        Some(Self {
            uri,
            version,
            diagnostics,
        })
    }

    /// The document this notification is about.
    pub fn document_uri(&self) -> DocumentUri {
        DocumentUri::parse(self.uri.as_str())
    }

    /// Lens diagnostics in server order.
    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .iter()
            .map(LspDiagnostic::to_diagnostic)
            .collect()
    }
}

fn lsp_position_from_value(value: &Value) -> Option<LspPosition> {
    let line = u32::try_from(value.get("line")?.as_u64()?).ok()?;
    let character = u32::try_from(value.get("character")?.as_u64()?).ok()?;
    Some(LspPosition { line, character })
}

fn lsp_range_from_value(value: &Value) -> Option<LspRange> {
    let start = lsp_position_from_value(value.get("start")?)?;
    let end = lsp_position_from_value(value.get("end")?)?;
    Some(LspRange { start, end })
}
