//! # voltify-core
//!
//! Domain types and decision logic for the Voltify power-event overlay agent.
//!
//! The crate has no dependencies on OS APIs, async runtimes, or storage.  It
//! answers one question: given a power transition and a snapshot of the host
//! application's "active" flag, which overlay command (if any) should be
//! issued?
//!
//! # Architecture overview
//!
//! ```text
//! power transition ──► EventGate::handle(event, app_active)
//!                           │
//!                           ├─ Some(OverlayCommand::Start(params))
//!                           ├─ Some(OverlayCommand::Stop)
//!                           └─ None + Outcome::Ignored(AppInactive)
//! ```
//!
//! Executing the command against a real overlay host is the caller's job (see
//! the `voltify-agent` crate).  The caller reports the effect's result with
//! the same [`Outcome`] type, using [`OverlayError`] to describe failures.

pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `voltify_core::EventGate` instead of `voltify_core::domain::gate::EventGate`.
pub use domain::event::{ParsePowerEventError, PowerEvent};
pub use domain::gate::{Decision, EventGate, GateConfig};
pub use domain::outcome::{IgnoreReason, Outcome, OverlayError};
pub use domain::overlay::{
    OverlayCommand, OverlayRequestParams, ALARM_BODY, ALARM_HEIGHT_PX, ALARM_TITLE,
};
