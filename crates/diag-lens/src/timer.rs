//! Cancellable periodic refresh.
//!
//! The timer thread never touches lens state. It only posts [`LensEvent::Tick`] into the host's
//! event channel, so handlers keep running one at a time on the host's thread.

use crate::error::LensError;
use crate::host::LensEvent;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// A background thread posting [`LensEvent::Tick`] at a fixed interval.
///
/// Cancelled by [`RefreshTimer::cancel`] or on drop.
#[derive(Debug)]
pub struct RefreshTimer {
    interval: Duration,
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl RefreshTimer {
    /// Start posting ticks into `events` every `interval`.
    pub fn start(interval: Duration, events: Sender<LensEvent>) -> Result<Self, LensError> {
        if interval.is_zero() {
            return Err(LensError::ZeroRefreshInterval);
        }

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("diag-lens-refresh".to_string())
            .spawn(move || {
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            if events.send(LensEvent::Tick).is_err() {
                                log::debug!("refresh timer: event receiver dropped, stopping");
                                break;
                            }
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })?;

        log::debug!("refresh timer started ({interval:?})");
        Ok(Self {
            interval,
            stop: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// The tick interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns `true` until the timer is cancelled or its receiver goes away.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the timer and wait for its thread to exit. Idempotent.
    pub fn cancel(&mut self) {
        // Dropping the sender wakes the thread even if it is mid-wait.
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("refresh timer thread panicked");
            }
            log::debug!("refresh timer cancelled");
        }
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::TryRecvError;

    #[test]
    fn test_ticks_arrive() {
        let (tx, rx) = mpsc::channel();
        let _timer = RefreshTimer::start(Duration::from_millis(5), tx).unwrap();
        let first = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(first, LensEvent::Tick);
    }

    #[test]
    fn test_cancel_disconnects_channel() {
        let (tx, rx) = mpsc::channel();
        let mut timer = RefreshTimer::start(Duration::from_millis(5), tx).unwrap();
        assert_eq!(timer.interval(), Duration::from_millis(5));

        timer.cancel();
        assert!(!timer.is_running());
        timer.cancel();

        // Drain anything posted before the cancel; afterwards the sender is gone.
        loop {
            match rx.try_recv() {
                Ok(event) => assert_eq!(event, LensEvent::Tick),
                Err(TryRecvError::Disconnected) => break,
                Err(TryRecvError::Empty) => panic!("timer thread still holds the sender"),
            }
        }
    }

    #[test]
    fn test_zero_interval_rejected() {
        let (tx, _rx) = mpsc::channel();
        assert!(matches!(
            RefreshTimer::start(Duration::ZERO, tx),
            Err(LensError::ZeroRefreshInterval)
        ));
    }

    #[test]
    fn test_stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel();
        let mut timer = RefreshTimer::start(Duration::from_millis(1), tx).unwrap();
        drop(rx);
        // Joins once the thread notices the closed channel on its next tick.
        timer.cancel();
        assert!(!timer.is_running());
    }
}
