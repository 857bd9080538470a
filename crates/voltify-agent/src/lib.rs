//! voltify-agent library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does the agent do?
//!
//! The agent watches the machine's line power.  When a charger is plugged in
//! it asks the overlay host to show the charging alarm; when the charger is
//! removed it asks the host to hide it.  Both actions are suppressed while the
//! Voltify application has switched monitoring off, which it records in a
//! small persisted flag.
//!
//! 1. `infrastructure::power_source` turns line-power readings into
//!    [`PowerEvent`](voltify_core::PowerEvent)s.
//! 2. `application::handle_power_event` reads the active flag, asks the
//!    [`EventGate`](voltify_core::EventGate) what to do, and dispatches the
//!    resulting command.
//! 3. `infrastructure::overlay` carries out the command against the overlay
//!    host process.

/// Application layer: capability ports and the event-handling use case.
pub mod application;

/// Infrastructure layer: power monitor, flag store, overlay host, config.
pub mod infrastructure;
