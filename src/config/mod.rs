//! Configuration module.

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, ConfigError, ConfigFile,
    ResolvedConfig,
};

use std::time::Duration;

/// Default delay between the last scroll and the bottom check.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Default distance from the bottom, in pixels, that counts as "reached".
pub const DEFAULT_BOTTOM_MARGIN: u32 = 75;

/// Per-tracker tuning.
///
/// Every tracker created by a registry gets a copy of the registry's
/// config at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Quiet period after the last scroll before the bottom check runs.
    pub debounce: Duration,
    /// Distance from the bottom, in pixels, at which listeners are notified.
    pub bottom_margin: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            bottom_margin: DEFAULT_BOTTOM_MARGIN,
        }
    }
}

impl TrackerConfig {
    /// Config with an explicit debounce delay in milliseconds.
    pub fn with_debounce_ms(mut self, millis: u64) -> Self {
        self.debounce = Duration::from_millis(millis);
        self
    }

    /// Config with an explicit bottom margin.
    pub fn with_bottom_margin(mut self, margin: u32) -> Self {
        self.bottom_margin = margin;
        self
    }
}
