use std::io;
use std::time::Duration;
use thiserror::Error;

/// Errors reported by the lens.
///
/// Aggregation and rendering never fail; only configuration and the refresh timer can.
#[derive(Debug, Error)]
pub enum LensError {
    /// The refresh interval must be non-zero.
    #[error("refresh interval must be non-zero")]
    ZeroRefreshInterval,

    /// Tier thresholds must satisfy `0 < uneasy < distressed < critical`.
    #[error(
        "tier thresholds must be strictly ascending and non-zero (got {uneasy}/{distressed}/{critical})"
    )]
    ThresholdsNotAscending {
        /// Configured tier 1 bound.
        uneasy: usize,
        /// Configured tier 2 bound.
        distressed: usize,
        /// Configured tier 3 bound.
        critical: usize,
    },

    /// A refresh timer is already running for this driver.
    #[error("refresh timer already running (interval {0:?})")]
    RefreshAlreadyRunning(Duration),

    /// The refresh timer thread could not be spawned.
    #[error("failed to spawn refresh timer: {0}")]
    TimerSpawn(#[from] io::Error),
}
