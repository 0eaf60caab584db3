#![warn(missing_docs)]
//! Diag Lens - a headless diagnostics panel for editors
//!
//! # Overview
//!
//! `diag-lens` keeps a small panel that summarizes the errors and warnings of the focused
//! document. It does not draw anything itself: the host supplies diagnostics and the active
//! document through [`LensHost`], and receives [`PanelView`]s through [`PanelRenderer`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Host events (LensEvent) + RefreshTimer     │  ← Triggers
//! ├─────────────────────────────────────────────┤
//! │  PresentationDriver                         │  ← Decide & render
//! ├─────────────────────────────────────────────┤
//! │  VisualTier selection                       │  ← Count → indicator
//! ├─────────────────────────────────────────────┤
//! │  aggregate() → LineGroups + SeverityTally   │  ← Per-document reduction
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use diag_lens::{aggregate, Diagnostic, DiagnosticSeverity, TierThresholds, VisualTier};
//!
//! let result = aggregate(vec![
//!     Diagnostic::error(3, "expected `;`"),
//!     Diagnostic::warning(3, "unused variable"),
//!     Diagnostic::error(7, "cannot find value"),
//!     Diagnostic::new(9, DiagnosticSeverity::Hint, "consider borrowing"),
//! ]);
//!
//! assert_eq!(result.tally.errors, 2);
//! assert_eq!(result.tally.warnings, 1);
//! assert_eq!(result.groups.len(), 3);
//! assert_eq!(
//!     VisualTier::for_count(result.tally.errors, &TierThresholds::default()),
//!     VisualTier::Uneasy
//! );
//! ```
//!
//! # Module Description
//!
//! - [`diagnostics`] - Diagnostic records and severities
//! - [`uri`] - Document identity and scheme filtering
//! - [`aggregate`](mod@aggregate) - Line grouping and severity tallies
//! - [`tier`] - Count → visual tier mapping
//! - [`view`] - The rendered panel summary
//! - [`host`] - Host/renderer seams and events
//! - [`store`] - In-memory diagnostic store implementing [`LensHost`]
//! - [`driver`] - The presentation driver
//! - [`timer`] - Cancellable refresh timer
//! - [`options`] - Driver options

pub mod aggregate;
pub mod diagnostics;
pub mod driver;
mod error;
pub mod host;
pub mod options;
pub mod store;
pub mod tier;
pub mod timer;
pub mod uri;
pub mod view;

pub use aggregate::{Aggregation, LineGroups, SeverityTally, aggregate};
pub use diagnostics::{Diagnostic, DiagnosticSeverity};
pub use driver::PresentationDriver;
pub use error::LensError;
pub use host::{LensEvent, LensHost, PanelRenderer};
pub use options::{DEFAULT_REFRESH_INTERVAL, LensOptions};
pub use store::DiagnosticStore;
pub use tier::{TierThresholds, VisualTier};
pub use timer::RefreshTimer;
pub use uri::{DocumentUri, FILE_SCHEME};
pub use view::PanelView;
