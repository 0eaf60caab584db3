//! Visual tiers.
//!
//! A tier is the indicator bucket a count falls into. The panel picks one indicator per severity,
//! so error and warning tiers are always computed independently.

use serde::Deserialize;

/// One of four ordinal indicator buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VisualTier {
    /// Nothing to report (tier 0). Also the initial and disabled state.
    #[default]
    Resting,
    /// A few issues (tier 1).
    Uneasy,
    /// Several issues (tier 2).
    Distressed,
    /// Many issues (tier 3).
    Critical,
}

impl VisualTier {
    /// All tiers in ascending order.
    pub const ALL: [Self; 4] = [Self::Resting, Self::Uneasy, Self::Distressed, Self::Critical];

    /// Select the tier for `count`.
    pub fn for_count(count: usize, thresholds: &TierThresholds) -> Self {
        if count >= thresholds.critical {
            Self::Critical
        } else if count >= thresholds.distressed {
            Self::Distressed
        } else if count >= thresholds.uneasy {
            Self::Uneasy
        } else {
            Self::Resting
        }
    }

    /// Ordinal index (`0..=3`), used to pick an indicator asset.
    pub fn index(self) -> usize {
        match self {
            Self::Resting => 0,
            Self::Uneasy => 1,
            Self::Distressed => 2,
            Self::Critical => 3,
        }
    }

    /// Inverse of [`VisualTier::index`].
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Lower bounds (inclusive) of tiers 1, 2 and 3.
///
/// Counts below `uneasy` are tier 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    /// First count shown as [`VisualTier::Uneasy`].
    pub uneasy: usize,
    /// First count shown as [`VisualTier::Distressed`].
    pub distressed: usize,
    /// First count shown as [`VisualTier::Critical`].
    pub critical: usize,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            uneasy: 1,
            distressed: 5,
            critical: 10,
        }
    }
}

impl TierThresholds {
    /// Returns `true` if `0 < uneasy < distressed < critical`.
    pub fn is_ascending(&self) -> bool {
        0 < self.uneasy && self.uneasy < self.distressed && self.distressed < self.critical
    }
}
