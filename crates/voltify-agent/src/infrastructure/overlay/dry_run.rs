//! Dry-run overlay controller: logs commands instead of launching a host.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;
use voltify_core::{OverlayError, OverlayRequestParams};

use crate::application::ports::OverlayController;

/// [`OverlayController`] that only logs.
///
/// It keeps a virtual running flag so that redundant stops are still reported
/// as `StopNoop`, exactly like a real host.
pub struct DryRunOverlayController {
    service_name: String,
    running: AtomicBool,
}

impl DryRunOverlayController {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            running: AtomicBool::new(false),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl OverlayController for DryRunOverlayController {
    fn start(&self, params: &OverlayRequestParams) -> Result<(), OverlayError> {
        info!(
            service = %self.service_name,
            title = %params.title,
            body = %params.body,
            height_px = params.height_px,
            enable_drag = params.enable_drag,
            "[dry-run] start overlay"
        );
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) -> Result<(), OverlayError> {
        if !self.running.swap(false, Ordering::SeqCst) {
            return Err(OverlayError::StopNoop);
        }
        info!(service = %self.service_name, "[dry-run] stop overlay");
        Ok(())
    }
}
