//! Configuration file loading with precedence handling.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

use super::{duration_from_secs, SheetConfig};
use crate::animation::Easing;
use crate::model::{CellMetrics, Rgba};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "BOTTOMSHEET_CONFIG";

/// Environment variable overriding the transition duration, in milliseconds.
pub const DURATION_ENV_VAR: &str = "BOTTOMSHEET_DURATION_MS";

/// Environment variable overriding the dismiss velocity threshold, in points/s.
pub const VELOCITY_ENV_VAR: &str = "BOTTOMSHEET_VELOCITY_THRESHOLD";

/// Number of demo rows shown in the sheet when nothing else is configured.
pub const DEFAULT_ITEMS: usize = 5;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (permission issues, not a file, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or values (including colors).
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/bottomsheet/config.toml`.
///
/// ```toml
/// background_color = "#00000099"
/// content_background_color = "#ffffff"
/// height = 12                 # rows; omit to size to content
/// corner_radius = 16.0
/// transition_duration = 0.3   # seconds
/// dismiss_velocity_threshold = 500.0
/// dismiss_distance_fraction = 0.5
/// easing = "ease-in-out"
/// items = 5
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Backdrop color, `#RRGGBB` or `#RRGGBBAA`.
    #[serde(default)]
    pub background_color: Option<Rgba>,

    /// Sheet surface color.
    #[serde(default)]
    pub content_background_color: Option<Rgba>,

    /// Fixed sheet height in terminal rows.
    #[serde(default)]
    pub height: Option<u16>,

    /// Top corner radius in points.
    #[serde(default)]
    pub corner_radius: Option<f32>,

    /// Transition duration in seconds.
    #[serde(default)]
    pub transition_duration: Option<f64>,

    /// Dismiss velocity threshold in points per second.
    #[serde(default)]
    pub dismiss_velocity_threshold: Option<f32>,

    /// Travel fraction of the content height that dismisses on slow release.
    #[serde(default)]
    pub dismiss_distance_fraction: Option<f32>,

    /// Timing curve: "linear", "ease-in", "ease-out", "ease-in-out".
    #[serde(default)]
    pub easing: Option<Easing>,

    /// Number of demo rows in the sheet.
    #[serde(default)]
    pub items: Option<usize>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Tunables handed to the presentation controller.
    pub sheet: SheetConfig,
    /// Fixed height in rows, mirrored into `sheet.fixed_height` in points.
    pub height_rows: Option<u16>,
    /// Demo rows shown inside the sheet.
    pub items: usize,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            sheet: SheetConfig::default(),
            height_rows: None,
            items: DEFAULT_ITEMS,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    fn set_height_rows(&mut self, rows: Option<u16>) {
        self.height_rows = rows;
        self.sheet.fixed_height = rows.map(|rows| CellMetrics::default().rows_to_points(rows));
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/bottomsheet/bottomsheet.log` on Unix-like systems,
/// or the platform state directory elsewhere.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("bottomsheet").join("bottomsheet.log")
    } else {
        PathBuf::from("bottomsheet.log")
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
/// Returns `~/.config/bottomsheet/config.toml` on Unix, appropriate path on
/// other platforms. Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("bottomsheet").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `BOTTOMSHEET_CONFIG` environment variable
/// 3. Default path `~/.config/bottomsheet/config.toml`
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

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        if env_path.is_empty() {
            return Err(ConfigError::InvalidPath(format!(
                "{CONFIG_ENV_VAR} is set but empty"
            )));
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
    let mut resolved = ResolvedConfig::default();

    let Some(config) = config_file else {
        return resolved;
    };

    let defaults = SheetConfig::default();
    resolved.sheet = SheetConfig {
        background_color: config.background_color.unwrap_or(defaults.background_color),
        content_background_color: config
            .content_background_color
            .unwrap_or(defaults.content_background_color),
        fixed_height: None,
        corner_radius: config.corner_radius.unwrap_or(defaults.corner_radius),
        transition_duration: config
            .transition_duration
            .map(duration_from_secs)
            .unwrap_or(defaults.transition_duration),
        dismiss_velocity_threshold: config
            .dismiss_velocity_threshold
            .unwrap_or(defaults.dismiss_velocity_threshold),
        dismiss_distance_fraction: config
            .dismiss_distance_fraction
            .unwrap_or(defaults.dismiss_distance_fraction),
        easing: config.easing.unwrap_or(defaults.easing),
    };
    resolved.set_height_rows(config.height);
    resolved.items = config.items.unwrap_or(resolved.items);
    if let Some(path) = config.log_file_path {
        resolved.log_file_path = path;
    }

    resolved
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `BOTTOMSHEET_DURATION_MS`: transition duration in milliseconds
/// - `BOTTOMSHEET_VELOCITY_THRESHOLD`: dismiss velocity threshold
///
/// Unparseable values are logged and ignored.
pub fn apply_env_overrides(config: ResolvedConfig) -> ResolvedConfig {
    apply_env_overrides_from(config, |key| std::env::var(key).ok())
}

/// [`apply_env_overrides`] with an injectable variable lookup.
pub fn apply_env_overrides_from(
    mut config: ResolvedConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    if let Some(raw) = lookup(DURATION_ENV_VAR) {
        match raw.trim().parse::<u64>() {
            Ok(millis) => config.sheet.transition_duration = Duration::from_millis(millis),
            Err(e) => warn!(value = %raw, error = %e, "Ignoring {DURATION_ENV_VAR}"),
        }
    }

    if let Some(raw) = lookup(VELOCITY_ENV_VAR) {
        match raw.trim().parse::<f32>() {
            Ok(threshold) if threshold.is_finite() => {
                config.sheet.dismiss_velocity_threshold = threshold
            }
            Ok(_) => warn!(value = %raw, "Ignoring non-finite {VELOCITY_ENV_VAR}"),
            Err(e) => warn!(value = %raw, error = %e, "Ignoring {VELOCITY_ENV_VAR}"),
        }
    }

    config
}

/// CLI flags that override configuration when explicitly given.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CliOverrides {
    /// `--duration <MS>`
    pub duration_ms: Option<u64>,
    /// `--velocity-threshold <PTS_PER_SEC>`
    pub velocity_threshold: Option<f32>,
    /// `--height <ROWS>`
    pub height_rows: Option<u16>,
    /// `--items <N>`
    pub items: Option<usize>,
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, cli: CliOverrides) -> ResolvedConfig {
    if let Some(millis) = cli.duration_ms {
        config.sheet.transition_duration = Duration::from_millis(millis);
    }

    if let Some(threshold) = cli.velocity_threshold {
        config.sheet.dismiss_velocity_threshold = threshold;
    }

    if cli.height_rows.is_some() {
        config.set_height_rows(cli.height_rows);
    }

    if let Some(items) = cli.items {
        config.items = items;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
