//! Masks command

use super::load_config;
use crate::cli::args::MasksArgs;
use crate::cli::logging::{log, LogLevel};
use crate::sniper::{MaskSet, SniperStore};
use crate::{Error, Result};

pub fn run(args: &MasksArgs, level: LogLevel) -> Result<()> {
    let config = load_config(&args.config)?;
    config.validate().map_err(Error::InvalidConfig)?;

    let store = SniperStore::new(config.dir());
    store.ensure()?;

    if !store.has_importance() {
        return Err(Error::InvalidConfig(format!(
            "no importance scores stored in {}; run a training prepare pass first",
            config.dir().display()
        )));
    }
    let scores = store.load_importance()?;

    let max_param_sparsity = config.max_param_sparsity();
    let mut built = 0;
    for sparsity in config.schedule().levels() {
        if store.has_masks(sparsity, max_param_sparsity) {
            log(
                level,
                LogLevel::Verbose,
                &format!(
                    "sparsity {:.2}%: already stored",
                    sparsity * 100.0
                ),
            );
            continue;
        }

        let masks = MaskSet::from_importance(&scores, sparsity, max_param_sparsity);
        store.save_masks(&masks, sparsity, max_param_sparsity)?;
        built += 1;

        log(
            level,
            LogLevel::Normal,
            &format!(
                "sparsity {:.2}%: wrote {} (achieved {:.2}%)",
                sparsity * 100.0,
                store.masks_path(sparsity, max_param_sparsity).display(),
                masks.sparsity() * 100.0
            ),
        );
    }

    log(level, LogLevel::Normal, &format!("{built} mask set(s) built"));
    Ok(())
}
