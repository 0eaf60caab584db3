//! Lens options.
//!
//! The lens has no user-facing settings beyond enable/disable; these options exist so hosts and
//! tests can tune the refresh cadence and tier bounds. They deserialize from JSON:
//!
//! ```rust
//! use diag_lens::LensOptions;
//! use std::time::Duration;
//!
//! let opts: LensOptions = serde_json::from_str(r#"{ "refresh_interval_ms": 250 }"#).unwrap();
//! assert_eq!(opts.refresh_interval, Duration::from_millis(250));
//! assert_eq!(opts.thresholds.distressed, 5);
//! ```

use crate::error::LensError;
use crate::tier::TierThresholds;
use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// Default panel refresh cadence.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Options controlling the presentation driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LensOptions {
    /// Interval between unconditional panel refreshes.
    #[serde(rename = "refresh_interval_ms", deserialize_with = "duration_from_millis")]
    pub refresh_interval: Duration,
    /// Tier bounds shared by the error and warning indicators.
    pub thresholds: TierThresholds,
}

impl Default for LensOptions {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            thresholds: TierThresholds::default(),
        }
    }
}

impl LensOptions {
    /// Check the options for values the driver cannot honor.
    pub fn validate(&self) -> Result<(), LensError> {
        if self.refresh_interval.is_zero() {
            return Err(LensError::ZeroRefreshInterval);
        }
        if !self.thresholds.is_ascending() {
            let TierThresholds {
                uneasy,
                distressed,
                critical,
            } = self.thresholds;
            return Err(LensError::ThresholdsNotAscending {
                uneasy,
                distressed,
                critical,
            });
        }
        Ok(())
    }
}

fn duration_from_millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let opts = LensOptions::default();
        assert_eq!(opts.refresh_interval, Duration::from_secs(1));
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let opts = LensOptions {
            refresh_interval: Duration::ZERO,
            ..LensOptions::default()
        };
        assert!(matches!(
            opts.validate(),
            Err(LensError::ZeroRefreshInterval)
        ));
    }

    #[test]
    fn test_validate_rejects_unordered_thresholds() {
        let opts = LensOptions {
            thresholds: TierThresholds {
                uneasy: 1,
                distressed: 10,
                critical: 5,
            },
            ..LensOptions::default()
        };
        let err = opts.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "tier thresholds must be strictly ascending and non-zero (got 1/10/5)"
        );
    }

    #[test]
    fn test_deserialize_partial_thresholds() {
        let opts: LensOptions =
            serde_json::from_str(r#"{ "thresholds": { "critical": 20 } }"#).unwrap();
        assert_eq!(opts.refresh_interval, DEFAULT_REFRESH_INTERVAL);
        assert_eq!(opts.thresholds.uneasy, 1);
        assert_eq!(opts.thresholds.distressed, 5);
        assert_eq!(opts.thresholds.critical, 20);
    }
}
