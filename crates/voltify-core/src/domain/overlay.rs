//! Overlay request parameters and lifecycle commands.
//!
//! The overlay is a floating surface drawn above other applications by an
//! external hosting service.  This module only describes *what* to ask that
//! service for; it never talks to it.

use serde::{Deserialize, Serialize};

/// Title shown by the charging alarm overlay.
pub const ALARM_TITLE: &str = "Voltify Alarm";

/// Body text shown by the charging alarm overlay.
pub const ALARM_BODY: &str = "Charging Alarm Active";

/// Height of the charging alarm overlay in pixels.
pub const ALARM_HEIGHT_PX: u32 = 400;

/// Parameters passed to the overlay host when starting the overlay.
///
/// A fresh value is built for every `Connected` event.  It has no identity and
/// no lifecycle beyond the single start request that carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayRequestParams {
    /// Whether the user may drag the overlay around the screen.
    pub enable_drag: bool,
    pub title: String,
    pub body: String,
    pub height_px: u32,
}

impl OverlayRequestParams {
    /// Builds the fixed charging-alarm parameter set.
    ///
    /// Only `enable_drag` varies between deployments; the text and height are
    /// constants.
    pub fn charging_alarm(enable_drag: bool) -> Self {
        Self {
            enable_drag,
            title: ALARM_TITLE.to_string(),
            body: ALARM_BODY.to_string(),
            height_px: ALARM_HEIGHT_PX,
        }
    }
}

/// A lifecycle command for the overlay host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayCommand {
    /// Bring the overlay host to the foreground with these parameters.
    Start(OverlayRequestParams),
    /// Stop the overlay host.  Stopping a host that is not running is a no-op.
    Stop,
}

impl OverlayCommand {
    /// Short name used in log records.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Start(_) => "start",
            Self::Stop => "stop",
        }
    }
}
