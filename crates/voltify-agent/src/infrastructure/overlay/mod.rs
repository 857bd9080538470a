//! Overlay host controllers.
//!
//! The overlay itself is drawn by a separate program, the overlay host.  The
//! agent only starts and stops it.  The correct controller is chosen at
//! startup from configuration:
//!
//! - **`process`** – `ProcessOverlayController` runs the host as a child
//!   process, passing the request parameters on its command line.
//! - **`dry_run`** – `DryRunOverlayController` logs commands and tracks a
//!   virtual running state without launching anything.
//! - **`mock`** – `RecordingOverlayController` records calls for tests and can be
//!   told to fail starts.

pub mod dry_run;
pub mod mock;
pub mod process;

pub use dry_run::DryRunOverlayController;
pub use process::{ProcessOverlayConfig, ProcessOverlayController};
