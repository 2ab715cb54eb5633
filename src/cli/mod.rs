//! Command-line interface module.

pub mod apply;
mod args;
pub mod clean;

pub use args::{ApplyArgs, Cli, Commands, FilterKind};
