//! Scripted power source for tests.
//!
//! Replays a fixed list of readings, one per poll.  Once the script is
//! exhausted the last reading repeats, which is what a real supply looks like
//! after the cable stops moving.

use std::collections::VecDeque;
use std::sync::Mutex;

use super::{PowerSource, PowerSourceError};

/// A [`PowerSource`] that replays scripted readings.
pub struct ScriptedPowerSource {
    script: Mutex<VecDeque<Option<bool>>>,
    last: Mutex<Option<bool>>,
}

impl ScriptedPowerSource {
    pub fn new(readings: impl IntoIterator<Item = Option<bool>>) -> Self {
        Self {
            script: Mutex::new(readings.into_iter().collect()),
            last: Mutex::new(None),
        }
    }

    /// Convenience constructor for scripts without unknown readings.
    pub fn from_states(states: &[bool]) -> Self {
        Self::new(states.iter().copied().map(Some))
    }

    /// Number of scripted readings not yet returned.
    pub fn remaining(&self) -> usize {
        self.script.lock().expect("lock poisoned").len()
    }
}

impl PowerSource for ScriptedPowerSource {
    fn read_online(&self) -> Result<Option<bool>, PowerSourceError> {
        let mut last = self.last.lock().expect("lock poisoned");
        if let Some(next) = self.script.lock().expect("lock poisoned").pop_front() {
            *last = next;
        }
        Ok(*last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replays_script_then_repeats_last_reading() {
        // Arrange
        let source = ScriptedPowerSource::from_states(&[false, true]);

        // Act / Assert
        assert_eq!(source.read_online().unwrap(), Some(false));
        assert_eq!(source.read_online().unwrap(), Some(true));
        assert_eq!(source.remaining(), 0);
        assert_eq!(source.read_online().unwrap(), Some(true));
    }

    #[test]
    fn test_empty_script_reads_unknown() {
        let source = ScriptedPowerSource::from_states(&[]);
        assert_eq!(source.read_online().unwrap(), None);
    }
}
