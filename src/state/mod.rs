//! Sheet interaction state (pure).
//!
//! All transitions are synchronous functions returning effects, testable
//! without a terminal or an animator.

pub mod machine;

pub use machine::{SheetEffect, SheetLayout, SheetMachine, SheetPhase};
