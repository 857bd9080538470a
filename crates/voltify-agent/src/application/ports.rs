//! Capability ports consumed by the event-handling use case.
//!
//! ```text
//!   FlagReader ──┐
//!                ├──▶ HandlePowerEventUseCase ──▶ OverlayController
//!   PowerEvent ──┘
//! ```
//!
//! Infrastructure adapters implement these traits; the use case only ever sees
//! `Arc<dyn ...>` so the adapters can be swapped for mocks in tests.

use std::path::PathBuf;

use thiserror::Error;
use voltify_core::{OverlayError, OverlayRequestParams};

/// Error type for flag store reads.
#[derive(Debug, Error)]
pub enum FlagError {
    /// The backing file exists but could not be read.
    #[error("I/O error reading flag {key:?} at {path}: {source}")]
    Io {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store itself cannot be reached.
    #[error("flag store unavailable: {0}")]
    Unavailable(String),
}

/// Read-only access to the host application's persisted boolean flags.
#[cfg_attr(test, mockall::automock)]
pub trait FlagReader: Send + Sync {
    /// Reads the flag stored under `key`.
    ///
    /// Returns `Ok(None)` when the key has never been written.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError`] if the store holds the key but cannot read it.
    fn read_flag(&self, key: &str) -> Result<Option<bool>, FlagError>;
}

/// Start/stop access to the overlay-hosting service.
///
/// Implementations must treat `stop` on a host that is not running as a no-op,
/// either by returning `Ok(())` or [`OverlayError::StopNoop`].
#[cfg_attr(test, mockall::automock)]
pub trait OverlayController: Send + Sync {
    /// Brings the overlay host up with `params`.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::ServiceUnavailable`] or
    /// [`OverlayError::StartRejected`] when the host cannot be started.
    fn start(&self, params: &OverlayRequestParams) -> Result<(), OverlayError>;

    /// Stops the overlay host.
    ///
    /// # Errors
    ///
    /// May return [`OverlayError::StopNoop`] when nothing was running.
    fn stop(&self) -> Result<(), OverlayError>;
}
