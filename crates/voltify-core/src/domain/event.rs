//! Power transition events.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A system-level power transition.
///
/// The two variants are mutually exclusive and carry no payload: the operating
/// system only tells us that external power was attached or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerEvent {
    /// An external power source (charger, dock, USB supply) was attached.
    Connected,
    /// The external power source was removed.
    Disconnected,
}

impl PowerEvent {
    /// Returns the event matching a line-power reading: `true` means online.
    pub const fn from_online(online: bool) -> Self {
        if online {
            Self::Connected
        } else {
            Self::Disconnected
        }
    }

    /// Stable lowercase name used in log records.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }
}

impl fmt::Display for PowerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a [`PowerEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown power event {0:?} (expected \"connected\" or \"disconnected\")")]
pub struct ParsePowerEventError(pub String);

impl FromStr for PowerEvent {
    type Err = ParsePowerEventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "connected" | "plugged" | "on" => Ok(Self::Connected),
            "disconnected" | "unplugged" | "off" => Ok(Self::Disconnected),
            _ => Err(ParsePowerEventError(s.to_string())),
        }
    }
}
