//! Domain entities for the Voltify agent.
//!
//! Everything in this module is pure: no I/O, no clocks, no global state.
//! Code in the agent's application and infrastructure layers depends on these
//! types, but this module never depends on them, which keeps the decision
//! logic testable on any platform without setup.

/// Power transition events delivered by the operating system.
pub mod event;

/// The event gate: maps `(event, app_active)` to an overlay command.
pub mod gate;

/// Outcomes of handling an event and the overlay error taxonomy.
pub mod outcome;

/// Overlay request parameters and lifecycle commands.
pub mod overlay;
