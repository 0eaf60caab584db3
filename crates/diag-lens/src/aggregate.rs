//! Diagnostic aggregation.
//!
//! [`aggregate`] is the single reduction used by every lens code path: it buckets one document's
//! diagnostics by start line and tallies errors and warnings in the same pass.
//!
//! The per-line buckets are not read by the panel today, but they are always built: the tally is
//! defined over the grouping, and per-line consumers (gutter markers, inline messages) attach
//! here.

use crate::diagnostics::{Diagnostic, DiagnosticSeverity};
use indexmap::IndexMap;
use indexmap::map::Iter;

/// Error and warning totals for one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SeverityTally {
    /// Number of [`DiagnosticSeverity::Error`] diagnostics.
    pub errors: usize,
    /// Number of [`DiagnosticSeverity::Warning`] diagnostics.
    pub warnings: usize,
}

impl SeverityTally {
    /// Create a tally.
    pub fn new(errors: usize, warnings: usize) -> Self {
        Self { errors, warnings }
    }

    /// Returns `true` if there are neither errors nor warnings.
    pub fn is_clean(&self) -> bool {
        self.errors == 0 && self.warnings == 0
    }

    fn record(&mut self, severity: DiagnosticSeverity) {
        match severity {
            DiagnosticSeverity::Error => self.errors += 1,
            DiagnosticSeverity::Warning => self.warnings += 1,
            DiagnosticSeverity::Information | DiagnosticSeverity::Hint => {}
        }
    }
}

/// Diagnostics of one document bucketed by start line.
///
/// Buckets iterate in first-seen line order; entries within a bucket keep the order the host
/// reported them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineGroups {
    lines: IndexMap<u32, Vec<Diagnostic>>,
}

impl LineGroups {
    /// Number of distinct lines with at least one diagnostic.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if no line has a diagnostic.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Diagnostics starting on `line`, if any.
    pub fn line(&self, line: u32) -> Option<&[Diagnostic]> {
        self.lines.get(&line).map(Vec::as_slice)
    }

    /// Lines with diagnostics, in first-seen order.
    pub fn lines(&self) -> impl Iterator<Item = u32> + '_ {
        self.lines.keys().copied()
    }

    /// Iterate `(line, diagnostics)` buckets in first-seen order.
    pub fn iter(&self) -> Iter<'_, u32, Vec<Diagnostic>> {
        self.lines.iter()
    }

    /// Total number of diagnostics across all buckets.
    pub fn diagnostic_count(&self) -> usize {
        self.lines.values().map(Vec::len).sum()
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        self.lines
            .entry(diagnostic.line)
            .or_default()
            .push(diagnostic);
    }
}

impl<'a> IntoIterator for &'a LineGroups {
    type Item = (&'a u32, &'a Vec<Diagnostic>);
    type IntoIter = Iter<'a, u32, Vec<Diagnostic>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Result of [`aggregate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    /// Per-line buckets.
    pub groups: LineGroups,
    /// Error/warning totals.
    pub tally: SeverityTally,
}

/// Group one document's diagnostics by start line and tally errors and warnings.
///
/// The input must already be scoped to a single document. Order does not matter for the tally.
/// This never fails; an empty input yields an empty grouping and a `(0, 0)` tally.
pub fn aggregate<I>(diagnostics: I) -> Aggregation
where
    I: IntoIterator<Item = Diagnostic>,
{
    let mut out = Aggregation::default();
    for diagnostic in diagnostics {
        out.tally.record(diagnostic.severity);
        out.groups.push(diagnostic);
    }
    out
}
