//! Schedule command

use super::load_config;
use crate::cli::args::{OutputFormat, ScheduleArgs};
use crate::cli::logging::{log, LogLevel};
use crate::{Error, Result};
use serde::Serialize;

#[derive(Serialize)]
struct ScheduleRow {
    epoch: usize,
    sparsity: f32,
    transition: bool,
}

pub fn run(args: &ScheduleArgs, level: LogLevel) -> Result<()> {
    let config = load_config(&args.config)?;
    config.validate().map_err(Error::InvalidConfig)?;

    let schedule = config.schedule();
    let epochs = args
        .epochs
        .unwrap_or_else(|| schedule.last_transition_epoch() + 1);

    let rows: Vec<ScheduleRow> = (0..epochs)
        .map(|epoch| ScheduleRow {
            epoch,
            sparsity: schedule.sparsity_at_epoch(epoch),
            transition: schedule.is_transition_epoch(epoch),
        })
        .collect();

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&rows)
                .map_err(|e| Error::Serialization(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
        OutputFormat::Text => {
            log(level, LogLevel::Normal, "epoch  sparsity");
            for row in &rows {
                let marker = if row.transition { "  <- transition" } else { "" };
                log(
                    level,
                    LogLevel::Normal,
                    &format!("{:>5}  {:>7.2}%{}", row.epoch, row.sparsity * 100.0, marker),
                );
            }
        }
    }

    Ok(())
}
