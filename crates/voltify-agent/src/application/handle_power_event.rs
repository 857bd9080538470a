//! HandlePowerEventUseCase: turns one power transition into at most one
//! overlay command and records what happened.
//!
//! # Flow per event
//!
//! ```text
//! read active flag (once) ──► EventGate::handle ──► dispatch(command) ──► log
//! ```
//!
//! - The flag is read fresh for every event; nothing is cached between events.
//! - A missing flag, or a flag that cannot be read, counts as "inactive".
//! - Errors from the overlay host are downgraded to [`Outcome::Failed`] and
//!   logged.  They are never returned to the caller: power notifications are
//!   one-shot and the next transition is the natural retry point.

use std::sync::Arc;

use tracing::{info, warn};
use voltify_core::{EventGate, Outcome, OverlayCommand, PowerEvent};

use super::ports::{FlagReader, OverlayController};

/// Everything known about one handled event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandledEvent {
    pub event: PowerEvent,
    /// The active-flag snapshot the decision was made with.
    pub app_active: bool,
    /// The command produced by the gate, if any.
    pub command: Option<OverlayCommand>,
    /// The final outcome after dispatch.
    pub outcome: Outcome,
}

/// Executes `command` against `overlay` and classifies the result.
///
/// `StopNoop` counts as success; every other error becomes
/// [`Outcome::Failed`].
pub fn dispatch(overlay: &dyn OverlayController, command: &OverlayCommand) -> Outcome {
    let result = match command {
        OverlayCommand::Start(params) => overlay.start(params),
        OverlayCommand::Stop => overlay.stop(),
    };
    Outcome::from_dispatch(result)
}

/// The Handle Power Event use case.
pub struct HandlePowerEventUseCase {
    gate: EventGate,
    flag_key: String,
    flags: Arc<dyn FlagReader>,
    overlay: Arc<dyn OverlayController>,
}

impl HandlePowerEventUseCase {
    /// Creates a use case reading the active flag stored under `flag_key`.
    pub fn new(
        gate: EventGate,
        flag_key: impl Into<String>,
        flags: Arc<dyn FlagReader>,
        overlay: Arc<dyn OverlayController>,
    ) -> Self {
        Self {
            gate,
            flag_key: flag_key.into(),
            flags,
            overlay,
        }
    }

    pub fn gate(&self) -> &EventGate {
        &self.gate
    }

    pub fn flag_key(&self) -> &str {
        &self.flag_key
    }

    /// Handles one event and returns its final outcome.
    pub fn handle(&self, event: PowerEvent) -> Outcome {
        self.handle_detailed(event).outcome
    }

    /// Handles one event and returns the full record, including the command.
    pub fn handle_detailed(&self, event: PowerEvent) -> HandledEvent {
        let app_active = self.read_active_flag();
        let (command, provisional) = self.gate.handle(event, app_active);

        let outcome = match &command {
            Some(cmd) => dispatch(self.overlay.as_ref(), cmd),
            None => provisional,
        };

        let command_kind = command.as_ref().map_or("none", OverlayCommand::kind);
        if outcome.is_failed() {
            warn!(
                event = %event,
                app_active,
                command = command_kind,
                outcome = %outcome,
                "overlay command failed"
            );
        } else {
            info!(
                event = %event,
                app_active,
                command = command_kind,
                outcome = %outcome,
                "power event handled"
            );
        }

        HandledEvent {
            event,
            app_active,
            command,
            outcome,
        }
    }

    /// Reads the active flag once.  Absent or unreadable means inactive.
    fn read_active_flag(&self) -> bool {
        match self.flags.read_flag(&self.flag_key) {
            Ok(value) => value.unwrap_or(false),
            Err(e) => {
                warn!(key = %self.flag_key, "active flag unreadable, treating as inactive: {e}");
                false
            }
        }
    }
}
