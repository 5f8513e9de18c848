//! Error types for the bottomsheet binary and library.
//!
//! The interaction core has no recoverable-error taxonomy: malformed gesture
//! sequences always settle into a stable phase instead of failing. Errors only
//! exist at the edges: presenting twice, loading configuration, initializing
//! logging, and driving the terminal.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error returned by the binary's run loop
//!   - [`ConfigError`](crate::config::ConfigError) - config file read/parse failures
//!   - [`LoggingError`](crate::logging::LoggingError) - tracing subscriber setup
//!   - `std::io::Error` - terminal setup and rendering failures
//! - [`PresentError`] - returned by the presentation controller

use thiserror::Error;

use crate::config::ConfigError;
use crate::logging::LoggingError;

/// Top-level application error encompassing all failure modes of the binary.
///
/// Every variant is fatal for the interactive host: the binary restores the
/// terminal and exits with the message on stderr.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration file exists but could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tracing subscriber could not be installed.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Terminal or TUI rendering error.
    ///
    /// Raw mode, alternate screen, mouse capture, or drawing failed.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Errors reported by [`PresentationController::present`](crate::lifecycle::PresentationController::present).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PresentError {
    /// A session is already active; each controller presents one sheet at a time.
    #[error("a bottom sheet is already presented")]
    AlreadyPresented,
}
