//! Bottom sheet demo - Entry Point

use bottomsheet::config::CliOverrides;
use bottomsheet::model::AppError;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Bottom sheet demo - a draggable, dismissible panel in the terminal
#[derive(Parser, Debug)]
#[command(name = "bottomsheet")]
#[command(version)]
#[command(about = "Interactive bottom sheet: present, drag down, flick or tap away")]
pub struct Args {
    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Transition duration in milliseconds
    #[arg(short, long, value_name = "MS")]
    pub duration: Option<u64>,

    /// Release velocity (points per second) above which the sheet dismisses
    #[arg(long, value_name = "PTS_PER_SEC", allow_negative_numbers = true)]
    pub velocity_threshold: Option<f32>,

    /// Fixed sheet height in rows (sized to content if omitted)
    #[arg(long, value_name = "ROWS", value_parser = clap::value_parser!(u16).range(1..))]
    pub height: Option<u16>,

    /// Number of demo rows shown in the sheet
    #[arg(short, long, value_name = "N")]
    pub items: Option<usize>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            duration_ms: self.duration,
            velocity_threshold: self.velocity_threshold,
            height_rows: self.height,
            items: self.items,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Honor NO_COLOR (https://no-color.org) as well as the flag.
    let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();

    // Load configuration with full precedence chain:
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        // 1. Load config file (or None if missing)
        let config_file =
            bottomsheet::config::load_config_with_precedence(args.config.clone())
                .map_err(AppError::from)?;

        // 2. Merge with defaults
        let merged = bottomsheet::config::merge_config(config_file);

        // 3. Apply environment variable overrides
        let with_env = bottomsheet::config::apply_env_overrides(merged);

        // 4. Apply CLI argument overrides (only flags that were given)
        bottomsheet::config::apply_cli_overrides(with_env, args.overrides())
    };

    // Initialize tracing with configured log file path
    bottomsheet::logging::init(&config.log_file_path).map_err(AppError::from)?;

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );

    bottomsheet::view::run(&config, use_color)?;

    Ok(())
}
