//! Interactive bottom sheet
//!
//! A modal panel that slides up from the bottom edge over a dimmed backdrop,
//! follows a vertical drag, and on release either snaps back or slides away.
//!
//! The interaction core (`gesture`, `state`, `lifecycle`) is headless: it
//! returns effects for an [`animation::Animator`] and a
//! [`lifecycle::SheetHost`] to carry out. The `view` module hosts it in a
//! terminal with ratatui and crossterm.

pub mod animation;
pub mod config;
pub mod gesture;
pub mod lifecycle;
pub mod logging;
pub mod model;
pub mod state;
pub mod view;
