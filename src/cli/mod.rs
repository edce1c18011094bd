//! CLI module
//!
//! Argument parsing and command handlers for the `podar` binary.

mod args;
mod commands;
mod logging;

pub use args::{Cli, Command, InfoArgs, MasksArgs, OutputFormat, ScheduleArgs, ValidateArgs};
pub use commands::run_command;
pub use logging::LogLevel;
