//! CLI command implementations.

pub mod cells;
pub mod flags;
pub mod run;
