//! TOML-based configuration persistence for the agent.
//!
//! Reads `AppConfig` from the platform-appropriate config file:
//! - Windows:  `%APPDATA%\Voltify\config.toml`
//! - Linux:    `~/.config/voltify/config.toml`
//! - macOS:    `~/Library/Application Support/Voltify/config.toml`
//!
//! Example:
//!
//! ```toml
//! [agent]
//! log_level = "info"
//!
//! [gate]
//! gate_on_active_flag = true
//! enable_drag = true
//!
//! [flag]
//! key = "state"
//!
//! [power]
//! sysfs_root = "/sys/class/power_supply"
//! poll_interval_ms = 1000
//!
//! [overlay]
//! service_name = "voltify-overlay"
//! program = "voltify-overlay"
//! args = []
//! dry_run = false
//! ```
//!
//! Every section and field has a serde default, so an empty file (or no file)
//! yields [`AppConfig::default()`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use voltify_core::GateConfig;

use crate::infrastructure::flag_store::DEFAULT_FLAG_KEY;
use crate::infrastructure::overlay::ProcessOverlayConfig;
use crate::infrastructure::power_source::sysfs::DEFAULT_SYSFS_ROOT;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level agent configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub gate: GateConfig,
    #[serde(default)]
    pub flag: FlagConfig,
    #[serde(default)]
    pub power: PowerConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
}

/// General agent behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Where the application's active flag lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlagConfig {
    /// Directory holding `<key>.txt`.  Defaults to the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_dir: Option<PathBuf>,
    /// Name of the flag written by the application while it is active.
    #[serde(default = "default_flag_key")]
    pub key: String,
}

/// Line-power monitor settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PowerConfig {
    /// Root of the `power_supply` sysfs class.
    #[serde(default = "default_sysfs_root")]
    pub sysfs_root: PathBuf,
    /// Milliseconds between line-power readings.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// Overlay host settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverlayConfig {
    /// Logical name of the overlay-hosting service.
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Executable that draws the overlay.
    #[serde(default = "default_program")]
    pub program: String,
    /// Extra arguments passed before the request parameters.
    #[serde(default)]
    pub args: Vec<String>,
    /// Log commands instead of launching the host.
    #[serde(default)]
    pub dry_run: bool,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_flag_key() -> String {
    DEFAULT_FLAG_KEY.to_string()
}
fn default_sysfs_root() -> PathBuf {
    PathBuf::from(DEFAULT_SYSFS_ROOT)
}
fn default_poll_interval_ms() -> u64 {
    1000
}
fn default_service_name() -> String {
    "voltify-overlay".to_string()
}
fn default_program() -> String {
    "voltify-overlay".to_string()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for FlagConfig {
    fn default() -> Self {
        Self {
            store_dir: None,
            key: default_flag_key(),
        }
    }
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            sysfs_root: default_sysfs_root(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            program: default_program(),
            args: Vec::new(),
            dry_run: false,
        }
    }
}

impl PowerConfig {
    /// Poll interval as a `Duration`, never shorter than 10 ms.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(10))
    }
}

impl From<&OverlayConfig> for ProcessOverlayConfig {
    fn from(cfg: &OverlayConfig) -> Self {
        Self {
            service_name: cfg.service_name.clone(),
            program: cfg.program.clone(),
            args: cfg.args.clone(),
        }
    }
}

impl AppConfig {
    /// Directory of the flag store: the configured one, else the platform
    /// data directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoPlatformConfigDir`] when neither is available.
    pub fn flag_store_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.flag.store_dir {
            Some(dir) => Ok(dir.clone()),
            None => platform_data_dir().ok_or(ConfigError::NoPlatformConfigDir),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the platform config base
/// directory cannot be determined from the environment.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads `AppConfig` from the platform config file.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the file
/// does not yet exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Resolves the platform config directory including the `voltify` component.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Voltify"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("voltify"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(|h| PathBuf::from(h).join("Library").join("Application Support").join("Voltify"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

/// Resolves the platform data directory where the application keeps its flags.
fn platform_data_dir() -> Option<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local").join("share"))
            })?;
        Some(base.join("voltify"))
    }

    #[cfg(not(target_os = "linux"))]
    {
        platform_config_dir()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
