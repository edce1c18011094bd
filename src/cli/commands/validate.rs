//! Validate command

use super::load_config;
use crate::cli::args::ValidateArgs;
use crate::cli::logging::{log, LogLevel};
use crate::{Error, Result};

pub fn run(args: &ValidateArgs, level: LogLevel) -> Result<()> {
    let config = load_config(&args.config)?;
    config.validate().map_err(Error::InvalidConfig)?;

    log(level, LogLevel::Normal, &format!("{} is valid", args.config.display()));
    log(
        level,
        LogLevel::Verbose,
        &format!(
            "schedule: {:.1}% -> {:.1}% over {} level(s), artifacts in {}",
            config.schedule().initial_sparsity() * 100.0,
            config.schedule().final_sparsity() * 100.0,
            config.schedule().levels().len(),
            config.dir().display()
        ),
    );
    Ok(())
}
