//! Configuration module.
//!
//! [`SheetConfig`] is the per-sheet tunable surface consumed by the core.
//! The [`loader`] submodule resolves it for the binary from defaults, a TOML
//! file, environment variables and CLI flags.

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, apply_env_overrides_from, default_config_path,
    default_log_path, load_config_file, load_config_with_precedence, merge_config, CliOverrides,
    ConfigError, ConfigFile, ResolvedConfig,
};

use std::time::Duration;

use crate::animation::Easing;
use crate::model::Rgba;

/// Default transition duration (300 ms).
pub const DEFAULT_TRANSITION_DURATION: Duration = Duration::from_millis(300);

/// Default release velocity, in points per second, above which a sheet dismisses.
pub const DEFAULT_DISMISS_VELOCITY_THRESHOLD: f32 = 500.0;

/// Tunables for one bottom sheet.
///
/// Latched by the presentation controller when a session starts. Edits made
/// afterwards only affect the next presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetConfig {
    /// Backdrop color drawn behind the sheet. Its alpha is the fully dimmed
    /// opacity; the drag-driven dim factor multiplies it.
    pub background_color: Rgba,

    /// Fill of the sheet surface.
    pub content_background_color: Rgba,

    /// Fixed content height in points. `None` lets the host size the sheet
    /// to its content.
    pub fixed_height: Option<f32>,

    /// Radius of the top-left and top-right corners, in points.
    pub corner_radius: f32,

    /// Duration of present, dismiss, restore and drag-dim animations.
    pub transition_duration: Duration,

    /// Release velocity (points/s, downward) above which the sheet dismisses
    /// regardless of travel.
    pub dismiss_velocity_threshold: f32,

    /// Fraction of the content height the sheet must travel below rest for a
    /// slow release to dismiss.
    pub dismiss_distance_fraction: f32,

    /// Timing curve for every transition.
    pub easing: Easing,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            background_color: Rgba::BLACK.with_alpha(0.6),
            content_background_color: Rgba::WHITE,
            fixed_height: None,
            corner_radius: 16.0,
            transition_duration: DEFAULT_TRANSITION_DURATION,
            dismiss_velocity_threshold: DEFAULT_DISMISS_VELOCITY_THRESHOLD,
            dismiss_distance_fraction: 0.5,
            easing: Easing::default(),
        }
    }
}

/// Convert a duration in seconds, clamping negative and non-finite values to zero.
pub fn duration_from_secs(secs: f64) -> Duration {
    if secs.is_finite() && secs > 0.0 {
        Duration::from_secs_f64(secs)
    } else {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_values() {
        let config = SheetConfig::default();
        assert_eq!(config.background_color, Rgba::BLACK.with_alpha(0.6));
        assert_eq!(config.content_background_color, Rgba::WHITE);
        assert_eq!(config.fixed_height, None);
        assert_eq!(config.corner_radius, 16.0);
        assert_eq!(config.transition_duration, Duration::from_millis(300));
        assert_eq!(config.dismiss_velocity_threshold, 500.0);
        assert_eq!(config.dismiss_distance_fraction, 0.5);
        assert_eq!(config.easing, Easing::EaseInOut);
    }

    #[test]
    fn negative_duration_clamps_to_zero() {
        assert_eq!(duration_from_secs(-0.3), Duration::ZERO);
        assert_eq!(duration_from_secs(f64::NAN), Duration::ZERO);
        assert_eq!(duration_from_secs(f64::INFINITY), Duration::ZERO);
    }

    #[test]
    fn positive_duration_converts() {
        assert_eq!(duration_from_secs(0.25), Duration::from_millis(250));
    }
}
