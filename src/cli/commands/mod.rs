//! CLI command handlers

mod info;
mod masks;
mod schedule;
mod validate;

use crate::cli::args::{Cli, Command};
use crate::cli::logging::LogLevel;
use crate::sniper::SniperConfig;
use crate::{Error, Result};
use std::path::Path;

/// Dispatch a parsed CLI invocation.
pub fn run_command(cli: Cli) -> Result<()> {
    let level = LogLevel::from_flags(cli.quiet, cli.verbose);

    match cli.command {
        Command::Validate(args) => validate::run(&args, level),
        Command::Schedule(args) => schedule::run(&args, level),
        Command::Masks(args) => masks::run(&args, level),
        Command::Info(args) => info::run(&args, level),
    }
}

/// Load a sniper configuration from a YAML file.
pub(crate) fn load_config(path: &Path) -> Result<SniperConfig> {
    let content = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&content)
        .map_err(|e| Error::Serialization(format!("failed to parse {}: {e}", path.display())))
}
