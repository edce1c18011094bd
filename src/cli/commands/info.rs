//! Info command

use crate::cli::args::InfoArgs;
use crate::cli::logging::{log, LogLevel};
use crate::sniper::{MaskSet, SniperStore};
use crate::{Error, Result};

pub fn run(args: &InfoArgs, level: LogLevel) -> Result<()> {
    let store = SniperStore::new(&args.dir);

    if !args.dir.exists() {
        return Err(Error::InvalidConfig(format!(
            "{} does not exist",
            args.dir.display()
        )));
    }

    log(level, LogLevel::Normal, &format!("sniper dir: {}", args.dir.display()));
    log(
        level,
        LogLevel::Normal,
        &format!("init snapshot: {}", present(store.has_init())),
    );
    log(
        level,
        LogLevel::Normal,
        &format!("importance scores: {}", present(store.has_importance())),
    );

    let files = store.list_mask_files()?;
    log(level, LogLevel::Normal, &format!("mask sets: {}", files.len()));

    for path in files {
        let content = std::fs::read_to_string(&path)?;
        let masks: MaskSet = serde_json::from_str(&content)
            .map_err(|e| Error::Serialization(format!("failed to parse {}: {e}", path.display())))?;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        log(
            level,
            LogLevel::Normal,
            &format!(
                "  {name}: {} param(s), sparsity {:.2}%",
                masks.len(),
                masks.sparsity() * 100.0
            ),
        );

        for (param, _) in masks.iter() {
            let density = masks.density(param).unwrap_or(0.0);
            log(
                level,
                LogLevel::Verbose,
                &format!("    {param}: density {:.2}%", density * 100.0),
            );
        }
    }

    Ok(())
}

fn present(stored: bool) -> &'static str {
    if stored {
        "stored"
    } else {
        "missing"
    }
}
