//! The event gate: the only decision logic in the system.
//!
//! # Decision table
//!
//! | event        | app active | result                          |
//! |--------------|------------|---------------------------------|
//! | Connected    | true       | `Start(charging_alarm params)`  |
//! | Connected    | false      | `None`, `Ignored(AppInactive)`  |
//! | Disconnected | true       | `Stop`                          |
//! | Disconnected | false      | `None`, `Ignored(AppInactive)`  |
//!
//! With `gate_on_active_flag = false` the "app active" column is not
//! consulted and every event produces a command.
//!
//! # Why gate at all?
//!
//! The overlay host can be addressable while the host application considers
//! itself inactive (for example after the user switched monitoring off).
//! Without the gate a stray cable event would bring back an overlay the user
//! believes is disabled.
//!
//! # Concurrency
//!
//! [`EventGate`] is `Copy` and holds only configuration, so `handle` can be
//! called from any number of threads at once.

use serde::{Deserialize, Serialize};

use super::event::PowerEvent;
use super::outcome::{IgnoreReason, Outcome};
use super::overlay::{OverlayCommand, OverlayRequestParams};

/// The result of [`EventGate::handle`]: at most one command plus an outcome.
///
/// When a command is present the outcome is provisionally
/// [`Outcome::Dispatched`]; the caller replaces it with the real result of the
/// dispatch step.
pub type Decision = (Option<OverlayCommand>, Outcome);

/// Behavioural options of the gate; the `[gate]` section of the agent config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Suppress every event while the host application is inactive.
    #[serde(default = "default_true")]
    pub gate_on_active_flag: bool,
    /// Value of `enable_drag` in every start request.
    #[serde(default = "default_true")]
    pub enable_drag: bool,
}

fn default_true() -> bool {
    true
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            gate_on_active_flag: true,
            enable_drag: true,
        }
    }
}

/// Stateless decision function over `(event, app_active)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventGate {
    config: GateConfig,
}

impl EventGate {
    pub const fn new(config: GateConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> GateConfig {
        self.config
    }

    /// Decides what to do with one power event.
    ///
    /// `is_app_active` is a snapshot the caller read from persisted state
    /// immediately before the call; the gate never reads storage itself.
    pub fn handle(&self, event: PowerEvent, is_app_active: bool) -> Decision {
        if self.config.gate_on_active_flag && !is_app_active {
            return (None, Outcome::Ignored(IgnoreReason::AppInactive));
        }

        let command = match event {
            PowerEvent::Connected => {
                OverlayCommand::Start(OverlayRequestParams::charging_alarm(self.config.enable_drag))
            }
            PowerEvent::Disconnected => OverlayCommand::Stop,
        };
        (Some(command), Outcome::Dispatched)
    }
}
