//! Configuration file loading with precedence handling.

use crate::config::TrackerConfig;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SCROLLWATCH_CONFIG";

/// Environment variable overriding the debounce delay (milliseconds).
pub const DEBOUNCE_ENV: &str = "SCROLLWATCH_DEBOUNCE_MS";

/// Environment variable overriding the bottom margin (pixels).
pub const BOTTOM_MARGIN_ENV: &str = "SCROLLWATCH_BOTTOM_MARGIN";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// An environment override could not be parsed.
    #[error("Invalid value {value:?} for {name}: expected a non-negative integer")]
    InvalidEnvValue {
        /// Variable name.
        name: String,
        /// Raw value found.
        value: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/scrollwatch/config.toml`:
///
/// ```toml
/// debounce_ms = 200
/// bottom_margin = 75
/// log_file_path = "/tmp/scrollwatch.log"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Debounce delay in milliseconds.
    #[serde(default)]
    pub debounce_ms: Option<u64>,

    /// Bottom margin in pixels.
    #[serde(default)]
    pub bottom_margin: Option<u32>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Parameters for every tracker.
    pub tracker: TrackerConfig,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            tracker: TrackerConfig::default(),
            log_file_path: default_log_path(),
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/scrollwatch/scrollwatch.log` on Unix-like
/// systems, or the platform equivalent. Falls back to the current
/// directory when no state directory exists.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("scrollwatch").join("scrollwatch.log")
    } else {
        PathBuf::from("scrollwatch.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/scrollwatch/config.toml` on Unix, appropriate path on
/// other platforms. Returns `None` if no config directory exists.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("scrollwatch").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `SCROLLWATCH_CONFIG` environment variable
/// 3. Default path `~/.config/scrollwatch/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        if env_path.is_empty() {
            return Err(ConfigError::InvalidPath(format!("{} is empty", CONFIG_ENV)));
        }
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        tracker: TrackerConfig {
            debounce: config
                .debounce_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.tracker.debounce),
            bottom_margin: config
                .bottom_margin
                .unwrap_or(defaults.tracker.bottom_margin),
        },
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `SCROLLWATCH_DEBOUNCE_MS`: Override debounce delay
/// - `SCROLLWATCH_BOTTOM_MARGIN`: Override bottom margin
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvValue` if a variable is set but is not a
/// non-negative integer.
pub fn apply_env_overrides(config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    apply_overrides_from(config, |name| std::env::var(name).ok())
}

/// Same as [`apply_env_overrides`], reading variables through `lookup`.
pub(crate) fn apply_overrides_from(
    mut config: ResolvedConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig, ConfigError> {
    if let Some(raw) = lookup(DEBOUNCE_ENV) {
        let millis: u64 = parse_env(DEBOUNCE_ENV, &raw)?;
        config.tracker.debounce = Duration::from_millis(millis);
    }

    if let Some(raw) = lookup(BOTTOM_MARGIN_ENV) {
        config.tracker.bottom_margin = parse_env(BOTTOM_MARGIN_ENV, &raw)?;
    }

    Ok(config)
}

fn parse_env<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnvValue {
            name: name.to_string(),
            value: raw.to_string(),
        })
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    debounce_ms_override: Option<u64>,
    bottom_margin_override: Option<u32>,
) -> ResolvedConfig {
    if let Some(millis) = debounce_ms_override {
        config.tracker.debounce = Duration::from_millis(millis);
    }

    if let Some(margin) = bottom_margin_override {
        config.tracker.bottom_margin = margin;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
