//! podar CLI
//!
//! # Usage
//!
//! ```bash
//! # Validate a config
//! podar validate config.yaml
//!
//! # Print the sparsity curve
//! podar schedule config.yaml --epochs 30
//!
//! # Build masks for every scheduled level from stored importance scores
//! podar masks config.yaml
//!
//! # Inspect a sniper artifact directory
//! podar info runs/demo
//! ```

use clap::Parser;
use podar::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
