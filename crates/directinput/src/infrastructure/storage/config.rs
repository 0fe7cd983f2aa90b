//! TOML-based configuration for the `directinput` binary.
//!
//! Reads and writes [`AppConfig`] to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\DirectInput\config.toml`
//! - Linux:    `~/.config/directinput/config.toml`
//! - macOS:    `~/Library/Application Support/DirectInput/config.toml`
//!
//! Example file:
//!
//! ```toml
//! [general]
//! log_level = "info"
//!
//! [failsafe]
//! enabled = true
//! trigger_keys = ["ctrl", "f12"]
//! hold_seconds = 3.0
//! poll_interval_ms = 100
//!
//! [input]
//! key_delay_ms = 10
//! write_key_delay_ms = 30
//! ```
//!
//! # Serde default values
//!
//! Every section and field has a default, so a missing file, an empty file,
//! or a file written by an older version all load without errors.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directinput_core::failsafe::config::hold_duration_from_secs;
use directinput_core::FailsafeOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::simulate_input::InputTiming;

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

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value parsed but is out of range.
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub failsafe: FailsafeSection,
    #[serde(default)]
    pub input: InputSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// `tracing` filter used when `RUST_LOG` is unset: `"error"` … `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Failsafe watchdog settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FailsafeSection {
    /// Start the watchdog at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Keys that must all be held.
    #[serde(default = "default_trigger_keys")]
    pub trigger_keys: Vec<String>,
    /// Continuous hold time, in seconds, before the process is aborted.
    #[serde(default = "default_hold_seconds")]
    pub hold_seconds: f64,
    /// Delay between key-state polls.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// Default delays for injected input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputSection {
    /// Press-to-release delay for key presses, hotkeys, and clicks.
    #[serde(default = "default_key_delay_ms")]
    pub key_delay_ms: u64,
    /// Press-to-release delay used when typing text.
    #[serde(default = "default_write_key_delay_ms")]
    pub write_key_delay_ms: u64,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}
fn default_trigger_keys() -> Vec<String> {
    vec![directinput_core::failsafe::DEFAULT_TRIGGER_KEY.to_string()]
}
fn default_hold_seconds() -> f64 {
    directinput_core::failsafe::DEFAULT_HOLD_DURATION.as_secs_f64()
}
fn default_poll_interval_ms() -> u64 {
    directinput_core::failsafe::DEFAULT_POLL_INTERVAL.as_millis() as u64
}
fn default_key_delay_ms() -> u64 {
    10
}
fn default_write_key_delay_ms() -> u64 {
    30
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for FailsafeSection {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            trigger_keys: default_trigger_keys(),
            hold_seconds: default_hold_seconds(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for InputSection {
    fn default() -> Self {
        Self {
            key_delay_ms: default_key_delay_ms(),
            write_key_delay_ms: default_write_key_delay_ms(),
        }
    }
}

impl FailsafeSection {
    /// Validates the section and converts it to watchdog options.
    ///
    /// The resulting options have no trigger callback, so firing terminates
    /// the process.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an empty key list, a negative or
    /// non-finite hold time, or a zero poll interval.
    pub fn to_options(&self) -> Result<FailsafeOptions, ConfigError> {
        if self.trigger_keys.is_empty() {
            return Err(ConfigError::Invalid {
                field: "failsafe.trigger_keys",
                reason: "at least one key is required".to_string(),
            });
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "failsafe.poll_interval_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        let hold = hold_duration_from_secs(self.hold_seconds).map_err(|e| ConfigError::Invalid {
            field: "failsafe.hold_seconds",
            reason: e.to_string(),
        })?;

        Ok(FailsafeOptions::new()
            .trigger_keys(self.trigger_keys.iter().cloned())
            .hold_duration(hold)
            .poll_interval(Duration::from_millis(self.poll_interval_ms))
            .enabled(self.enabled))
    }
}

impl InputSection {
    pub fn to_timing(&self) -> InputTiming {
        InputTiming {
            key_delay: Duration::from_millis(self.key_delay_ms),
            write_key_delay: Duration::from_millis(self.write_key_delay_ms),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the default config file.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from the default location.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the
/// file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Persists `config` to the default location.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(&config_file_path()?, config)
}

/// Persists `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("DirectInput"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("directinput"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("DirectInput")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
