//! Diagnostics data model.
//!
//! Diagnostics are owned by the host (a language server, a linter, the editor itself). The lens
//! only reads them: it never mutates, persists or deduplicates a [`Diagnostic`].

use std::fmt;

/// Diagnostic severity levels, ordered from most to least severe.
///
/// Only [`DiagnosticSeverity::Error`] and [`DiagnosticSeverity::Warning`] are tallied by the
/// lens. The other levels still take part in line grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticSeverity {
    /// Error diagnostics.
    Error,
    /// Warning diagnostics.
    Warning,
    /// Informational diagnostics.
    Information,
    /// Hint diagnostics.
    Hint,
}

impl DiagnosticSeverity {
    /// Returns `true` for [`DiagnosticSeverity::Error`].
    pub fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }

    /// Returns `true` for [`DiagnosticSeverity::Warning`].
    pub fn is_warning(self) -> bool {
        matches!(self, Self::Warning)
    }
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Information => "information",
            Self::Hint => "hint",
        };
        f.write_str(name)
    }
}

/// A single diagnostic reported for a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Zero-based line on which the diagnostic range starts.
    pub line: u32,
    /// Diagnostic severity.
    pub severity: DiagnosticSeverity,
    /// Diagnostic message.
    pub message: String,
    /// Optional diagnostic source (e.g. `"rust-analyzer"`).
    pub source: Option<String>,
    /// Optional diagnostic code (stringified).
    pub code: Option<String>,
}

impl Diagnostic {
    /// Create a diagnostic with no source or code.
    pub fn new(line: u32, severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
        Self {
            line,
            severity,
            message: message.into(),
            source: None,
            code: None,
        }
    }

    /// Shorthand for an error on `line`.
    pub fn error(line: u32, message: impl Into<String>) -> Self {
        Self::new(line, DiagnosticSeverity::Error, message)
    }

    /// Shorthand for a warning on `line`.
    pub fn warning(line: u32, message: impl Into<String>) -> Self {
        Self::new(line, DiagnosticSeverity::Warning, message)
    }

    /// Attach a source name.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attach a diagnostic code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        assert!(DiagnosticSeverity::Error < DiagnosticSeverity::Warning);
        assert!(DiagnosticSeverity::Warning < DiagnosticSeverity::Information);
        assert!(DiagnosticSeverity::Information < DiagnosticSeverity::Hint);
    }

    #[test]
    fn test_builder_helpers() {
        let d = Diagnostic::error(4, "boom")
            .with_source("rustc")
            .with_code("E0308");
        assert_eq!(d.line, 4);
        assert!(d.severity.is_error());
        assert_eq!(d.source.as_deref(), Some("rustc"));
        assert_eq!(d.code.as_deref(), Some("E0308"));
        assert_eq!(d.severity.to_string(), "error");
    }
}
