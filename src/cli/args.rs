//! CLI argument definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// podar: progressive-sparsity training
#[derive(Parser, Debug, Clone)]
#[command(name = "podar")]
#[command(version)]
#[command(about = "Progressive-sparsity training: start sparse, relax over time")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Validate a sniper configuration file without running anything
    Validate(ValidateArgs),

    /// Print the sparsity curve of a configured schedule
    Schedule(ScheduleArgs),

    /// Build and store masks for every scheduled sparsity level
    Masks(MasksArgs),

    /// Inspect a sniper artifact directory
    Info(InfoArgs),
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone)]
pub struct ValidateArgs {
    /// Path to the YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,
}

/// Arguments for the schedule command
#[derive(Parser, Debug, Clone)]
pub struct ScheduleArgs {
    /// Path to the YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Number of epochs to print (defaults to one past the last transition)
    #[arg(long)]
    pub epochs: Option<usize>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the masks command
#[derive(Parser, Debug, Clone)]
pub struct MasksArgs {
    /// Path to the YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,
}

/// Arguments for the info command
#[derive(Parser, Debug, Clone)]
pub struct InfoArgs {
    /// Sniper artifact directory
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,
}

/// Output format for machine-readable commands
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON
    Json,
}
