//! Line-power monitoring.
//!
//! A [`PowerSource`] reports whether external power is currently attached.
//! [`start_power_monitor`] polls it on a dedicated thread and emits a
//! [`PowerEvent`] on a channel each time the reading changes, so the rest of
//! the agent sees the same connect/disconnect transitions an OS broadcast
//! would deliver.
//!
//! # Polling and shutdown
//!
//! The monitor thread sleeps `poll_interval` between readings.  On each wake
//! it checks the `running` flag and exits when it is cleared; it also exits
//! when the receiver is dropped.  Either way the sender is dropped, so the
//! consumer's `recv().await` returns `None`.
//!
//! # Testability
//!
//! The `PowerSource` trait lets tests drive the monitor with scripted
//! readings (see [`mock::ScriptedPowerSource`]) instead of real sysfs files.

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use voltify_core::PowerEvent;

pub mod mock;
pub mod sysfs;

/// Error type for power source operations.
#[derive(Debug, Error)]
pub enum PowerSourceError {
    /// The power supply class directory does not exist.
    #[error("power supply directory {0} does not exist")]
    RootMissing(PathBuf),

    /// A supply attribute could not be read.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The monitor thread could not be spawned.
    #[error("failed to spawn power monitor thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Trait abstracting line-power readings.
pub trait PowerSource: Send {
    /// Returns `Some(true)` when external power is attached, `Some(false)`
    /// when it is not, and `None` when the machine has no external supply to
    /// report on.
    ///
    /// # Errors
    ///
    /// Returns [`PowerSourceError`] when the platform cannot be queried.
    fn read_online(&self) -> Result<Option<bool>, PowerSourceError>;
}

/// Turns a stream of readings into connect/disconnect transitions.
///
/// The first known reading only establishes the baseline: the agent reacts to
/// cable changes, not to the state it finds at startup.
#[derive(Debug, Default)]
pub struct TransitionDetector {
    last: Option<bool>,
}

impl TransitionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last known line-power state.
    pub fn current(&self) -> Option<bool> {
        self.last
    }

    /// Feeds one reading; returns an event if it differs from the last one.
    ///
    /// Unknown readings (`None`) are skipped and do not reset the baseline.
    pub fn observe(&mut self, reading: Option<bool>) -> Option<PowerEvent> {
        let online = reading?;
        let previous = self.last.replace(online);
        match previous {
            Some(prev) if prev != online => Some(PowerEvent::from_online(online)),
            _ => None,
        }
    }
}

/// Spawns a background thread that polls `source` and emits transitions.
///
/// The source is read once before the thread starts; that reading becomes the
/// baseline and surfaces configuration problems (such as a missing sysfs
/// directory) to the caller instead of the log.
///
/// # Errors
///
/// Returns the initial read error, or [`PowerSourceError::Spawn`] if the
/// thread cannot be created.
pub fn start_power_monitor<S>(
    source: S,
    poll_interval: Duration,
    running: Arc<AtomicBool>,
) -> Result<mpsc::Receiver<PowerEvent>, PowerSourceError>
where
    S: PowerSource + 'static,
{
    let initial = source.read_online()?;
    let mut detector = TransitionDetector::new();
    detector.observe(initial);

    let (tx, rx) = mpsc::channel(16);

    std::thread::Builder::new()
        .name("voltify-power".to_string())
        .spawn(move || monitor_loop(source, detector, poll_interval, tx, running))
        .map_err(PowerSourceError::Spawn)?;

    info!(
        "power monitor started (line power {}, poll interval {poll_interval:?})",
        match initial {
            Some(true) => "online",
            Some(false) => "offline",
            None => "unknown",
        }
    );
    Ok(rx)
}

/// The polling loop executed on the monitor thread.
fn monitor_loop<S: PowerSource>(
    source: S,
    mut detector: TransitionDetector,
    poll_interval: Duration,
    tx: mpsc::Sender<PowerEvent>,
    running: Arc<AtomicBool>,
) {
    while running.load(Ordering::Relaxed) {
        std::thread::sleep(poll_interval);
        if !running.load(Ordering::Relaxed) {
            break;
        }

        match source.read_online() {
            Ok(reading) => {
                if let Some(event) = detector.observe(reading) {
                    debug!("line power transition: {event}");
                    if tx.blocking_send(event).is_err() {
                        debug!("power event receiver dropped; stopping monitor");
                        break;
                    }
                }
            }
            Err(e) => warn!("power source read failed: {e}"),
        }
    }

    info!("power monitor stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_reading_sets_baseline_without_event() {
        let mut detector = TransitionDetector::new();
        assert_eq!(detector.observe(Some(true)), None);
        assert_eq!(detector.current(), Some(true));
    }

    #[test]
    fn test_changes_emit_matching_events() {
        // Arrange
        let mut detector = TransitionDetector::new();
        detector.observe(Some(false));

        // Act / Assert
        assert_eq!(detector.observe(Some(true)), Some(PowerEvent::Connected));
        assert_eq!(detector.observe(Some(false)), Some(PowerEvent::Disconnected));
    }

    #[test]
    fn test_repeated_readings_emit_nothing() {
        let mut detector = TransitionDetector::new();
        detector.observe(Some(true));
        assert_eq!(detector.observe(Some(true)), None);
        assert_eq!(detector.observe(Some(true)), None);
    }

    #[test]
    fn test_unknown_readings_are_skipped_and_keep_baseline() {
        // Arrange
        let mut detector = TransitionDetector::new();
        detector.observe(Some(true));

        // Act
        let during_unknown = detector.observe(None);
        let after = detector.observe(Some(false));

        // Assert
        assert_eq!(during_unknown, None);
        assert_eq!(after, Some(PowerEvent::Disconnected));
    }

    #[test]
    fn test_unknown_before_baseline_emits_nothing() {
        let mut detector = TransitionDetector::new();
        assert_eq!(detector.observe(None), None);
        assert_eq!(detector.current(), None);
        assert_eq!(detector.observe(Some(false)), None);
    }
}
