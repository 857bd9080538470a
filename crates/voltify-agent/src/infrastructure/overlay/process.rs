//! Child-process overlay host.
//!
//! Start launches the configured program as:
//!
//! ```text
//! <program> <args..> --title <title> --body <body> --height <px> [--enable-drag]
//! ```
//!
//! with `VOLTIFY_OVERLAY_SERVICE=<service name>` in its environment.  Stop
//! kills the child and reaps it.
//!
//! # Semantics
//!
//! - At most one child is alive.  Starting while a child is running replaces
//!   it, so the most recent request's parameters win.
//! - Stopping with no live child (never started, already stopped, or exited
//!   on its own) returns [`OverlayError::StopNoop`].
//! - Spawn errors are mapped onto the overlay error taxonomy: a missing
//!   program is `ServiceUnavailable`, a permission failure is `StartRejected`.

use std::io::ErrorKind;
use std::process::{Child, Command, Stdio};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};
use voltify_core::{OverlayError, OverlayRequestParams};

use crate::application::ports::OverlayController;

/// Environment variable carrying the logical service name to the host.
pub const SERVICE_NAME_ENV: &str = "VOLTIFY_OVERLAY_SERVICE";

/// How to launch the overlay host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOverlayConfig {
    /// Logical name of the overlay service, used in logs and passed to the host.
    pub service_name: String,
    /// Executable to run.  Resolved through `PATH` when not absolute.
    pub program: String,
    /// Arguments placed before the request parameters.
    pub args: Vec<String>,
}

/// [`OverlayController`] that hosts the overlay in a child process.
pub struct ProcessOverlayController {
    config: ProcessOverlayConfig,
    child: Mutex<Option<Child>>,
}

impl ProcessOverlayController {
    pub fn new(config: ProcessOverlayConfig) -> Self {
        Self {
            config,
            child: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &ProcessOverlayConfig {
        &self.config
    }

    /// Returns `true` while a started child has not exited.
    pub fn is_running(&self) -> bool {
        let mut guard = self.lock_child();
        match guard.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    /// Builds the command line for `params`.
    fn build_command(&self, params: &OverlayRequestParams) -> Command {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(&self.config.args)
            .arg("--title")
            .arg(&params.title)
            .arg("--body")
            .arg(&params.body)
            .arg("--height")
            .arg(params.height_px.to_string());
        if params.enable_drag {
            cmd.arg("--enable-drag");
        }
        cmd.env(SERVICE_NAME_ENV, &self.config.service_name)
            .stdin(Stdio::null());
        cmd
    }

    /// A poisoned lock only means another dispatch panicked mid-call; the
    /// `Option<Child>` inside is still coherent.
    fn lock_child(&self) -> MutexGuard<'_, Option<Child>> {
        self.child.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OverlayController for ProcessOverlayController {
    fn start(&self, params: &OverlayRequestParams) -> Result<(), OverlayError> {
        let mut guard = self.lock_child();

        if let Some(previous) = guard.take() {
            debug!("replacing running overlay host {}", self.config.service_name);
            terminate(previous);
        }

        let child = self
            .build_command(params)
            .spawn()
            .map_err(|e| classify_spawn_error(&self.config.program, &e))?;

        info!(
            "overlay host {} started (pid {})",
            self.config.service_name,
            child.id()
        );
        *guard = Some(child);
        Ok(())
    }

    fn stop(&self) -> Result<(), OverlayError> {
        let Some(mut child) = self.lock_child().take() else {
            return Err(OverlayError::StopNoop);
        };

        match child.try_wait() {
            Ok(Some(status)) => {
                debug!(
                    "overlay host {} had already exited ({status})",
                    self.config.service_name
                );
                Err(OverlayError::StopNoop)
            }
            _ => {
                terminate(child);
                info!("overlay host {} stopped", self.config.service_name);
                Ok(())
            }
        }
    }
}

/// Kills and reaps `child`.  Errors mean it is already gone.
fn terminate(mut child: Child) {
    if let Err(e) = child.kill() {
        debug!("kill overlay host pid {}: {e}", child.id());
    }
    if let Err(e) = child.wait() {
        warn!("failed to reap overlay host pid {}: {e}", child.id());
    }
}

/// Maps a spawn failure onto the overlay error taxonomy.
fn classify_spawn_error(program: &str, e: &std::io::Error) -> OverlayError {
    match e.kind() {
        ErrorKind::PermissionDenied => {
            OverlayError::StartRejected(format!("not permitted to run {program}: {e}"))
        }
        ErrorKind::NotFound => {
            OverlayError::ServiceUnavailable(format!("overlay host {program} not found"))
        }
        _ => OverlayError::ServiceUnavailable(format!("failed to launch {program}: {e}")),
    }
}
