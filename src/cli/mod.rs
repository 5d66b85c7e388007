//! Command-line interface definitions and handlers.

/// CLI argument parsing with clap.
pub mod args;

/// Subcommand implementations.
pub mod commands;

mod exit;

pub use args::{Args, Command, CommonArgs};
pub use exit::exit_code;
