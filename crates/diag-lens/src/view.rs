//! The rendered panel summary.

use crate::aggregate::SeverityTally;
use crate::tier::{TierThresholds, VisualTier};

/// Everything a renderer needs to draw the lens panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelView {
    /// Counts shown in the labels.
    pub tally: SeverityTally,
    /// Indicator for the error count.
    pub error_tier: VisualTier,
    /// Indicator for the warning count.
    pub warning_tier: VisualTier,
    /// Whether the lens was enabled when the view was computed.
    pub enabled: bool,
}

impl PanelView {
    /// The resting view: zero counts and tier 0 for both severities.
    ///
    /// Shown when the panel is first attached (before any measurement) and while disabled.
    pub fn resting(enabled: bool) -> Self {
        Self {
            tally: SeverityTally::default(),
            error_tier: VisualTier::Resting,
            warning_tier: VisualTier::Resting,
            enabled,
        }
    }

    /// Map a tally onto tiers.
    pub fn measured(tally: SeverityTally, thresholds: &TierThresholds) -> Self {
        Self {
            tally,
            error_tier: VisualTier::for_count(tally.errors, thresholds),
            warning_tier: VisualTier::for_count(tally.warnings, thresholds),
            enabled: true,
        }
    }

    /// `"<n> errors"`.
    pub fn error_label(&self) -> String {
        format!("{} errors", self.tally.errors)
    }

    /// `"<n> warnings"`.
    pub fn warning_label(&self) -> String {
        format!("{} warnings", self.tally.warnings)
    }
}
