//! Recording overlay controller for tests.
//!
//! Records every start and stop request in order so assertions can check the
//! exact command stream.  Behaves like a real host with respect to state:
//! stopping while nothing runs returns `StopNoop`.
//!
//! # `fail_start`
//!
//! Set `fail_start` to an error before dispatching to simulate an overlay
//! host that cannot be started (missing, denied, restricted).
//!
//! ```ignore
//! let overlay = Arc::new(RecordingOverlayController::failing_start(
//!     OverlayError::StartRejected("background start denied".into()),
//! ));
//! ```

use std::sync::Mutex;

use voltify_core::{OverlayError, OverlayRequestParams};

use crate::application::ports::OverlayController;

/// One recorded controller call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayCall {
    Start(OverlayRequestParams),
    Stop,
}

/// A controller that records calls without launching anything.
#[derive(Default)]
pub struct RecordingOverlayController {
    /// Every call, in order, including failed ones.
    pub calls: Mutex<Vec<OverlayCall>>,
    /// Whether the simulated host is running.
    pub running: Mutex<bool>,
    /// When set, every `start` returns this error and leaves state unchanged.
    pub fail_start: Option<OverlayError>,
}

impl RecordingOverlayController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_start(error: OverlayError) -> Self {
        Self {
            fail_start: Some(error),
            ..Self::default()
        }
    }

    /// Snapshot of the recorded calls.
    pub fn calls(&self) -> Vec<OverlayCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn is_running(&self) -> bool {
        *self.running.lock().unwrap()
    }
}

impl OverlayController for RecordingOverlayController {
    fn start(&self, params: &OverlayRequestParams) -> Result<(), OverlayError> {
        self.calls
            .lock()
            .unwrap()
            .push(OverlayCall::Start(params.clone()));
        if let Some(err) = &self.fail_start {
            return Err(err.clone());
        }
        *self.running.lock().unwrap() = true;
        Ok(())
    }

    fn stop(&self) -> Result<(), OverlayError> {
        self.calls.lock().unwrap().push(OverlayCall::Stop);
        let mut running = self.running.lock().unwrap();
        if !*running {
            return Err(OverlayError::StopNoop);
        }
        *running = false;
        Ok(())
    }
}
