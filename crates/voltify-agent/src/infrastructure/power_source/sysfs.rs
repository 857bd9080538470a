//! Linux line-power readings from the `power_supply` sysfs class.
//!
//! Every supply registered with the kernel appears as a directory under
//! `/sys/class/power_supply/` with a `type` attribute and, for external
//! supplies, an `online` attribute:
//!
//! ```text
//! /sys/class/power_supply/
//!   AC/type       = "Mains"
//!   AC/online     = "1"
//!   BAT0/type     = "Battery"
//!   ucsi-source-psy-USBC000:001/type   = "USB"
//!   ucsi-source-psy-USBC000:001/online = "0"
//! ```
//!
//! Line power is "online" when any external supply reports `online = 1`.
//! Batteries and UPS units are ignored.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::trace;

use super::{PowerSource, PowerSourceError};

/// Default location of the power supply class on Linux.
pub const DEFAULT_SYSFS_ROOT: &str = "/sys/class/power_supply";

/// Supply types that represent an external power source.
const EXTERNAL_SUPPLY_TYPES: &[&str] = &["Mains", "USB", "Wireless"];

/// [`PowerSource`] backed by the sysfs `power_supply` class.
#[derive(Debug, Clone)]
pub struct SysfsPowerSource {
    root: PathBuf,
}

impl SysfsPowerSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for SysfsPowerSource {
    fn default() -> Self {
        Self::new(DEFAULT_SYSFS_ROOT)
    }
}

impl PowerSource for SysfsPowerSource {
    fn read_online(&self) -> Result<Option<bool>, PowerSourceError> {
        read_line_power(&self.root)
    }
}

/// Reads the aggregate line-power state below `root`.
///
/// # Errors
///
/// Returns [`PowerSourceError::RootMissing`] when `root` does not exist and
/// [`PowerSourceError::Io`] when the directory cannot be listed.
pub fn read_line_power(root: &Path) -> Result<Option<bool>, PowerSourceError> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(PowerSourceError::RootMissing(root.to_path_buf()))
        }
        Err(source) => {
            return Err(PowerSourceError::Io {
                path: root.to_path_buf(),
                source,
            })
        }
    };

    let mut saw_external = false;
    for entry in entries.flatten() {
        let supply = entry.path();
        let Some(kind) = read_attr(&supply, "type") else {
            continue;
        };
        if !EXTERNAL_SUPPLY_TYPES.contains(&kind.as_str()) {
            continue;
        }
        let Some(online) = read_attr(&supply, "online") else {
            continue;
        };

        saw_external = true;
        trace!("supply {} ({kind}) online={online}", supply.display());
        if online == "1" {
            return Ok(Some(true));
        }
    }

    Ok(saw_external.then_some(false))
}

/// Reads a trimmed sysfs attribute, or `None` if it is absent or unreadable.
fn read_attr(supply: &Path, name: &str) -> Option<String> {
    fs::read_to_string(supply.join(name))
        .ok()
        .map(|s| s.trim().to_string())
}
