//! Application layer use cases for the agent.
//!
//! Use cases in this layer depend only on `voltify_core` and on the capability
//! traits in [`ports`]; they make no OS calls and touch no files.
//!
//! # Sub-modules
//!
//! - **`ports`** – The two narrow capabilities the agent needs from its host:
//!   reading a named boolean (`FlagReader`) and starting/stopping the overlay
//!   (`OverlayController`).
//!
//! - **`handle_power_event`** – Reads the active flag, runs the event gate,
//!   dispatches the command and records the outcome.  Failures from the
//!   overlay host end here; nothing propagates back to the event source.

pub mod handle_power_event;
pub mod ports;
