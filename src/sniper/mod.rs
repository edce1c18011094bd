//! Progressive-sparsity ("sniper") training
//!
//! Accelerates training by starting with most weights masked out and
//! relaxing the sparsity as epochs pass. The pieces:
//!
//! - **Schedule**: when sparsity drops ([`SparsitySchedule`])
//! - **Importance**: which weights matter, scored from loss gradients over
//!   calibration batches ([`SnipCollector`], [`ImportanceScores`])
//! - **Masks**: which weights survive at each level ([`MaskSet`])
//! - **Store**: on-disk cache of masks, scores, and the init snapshot
//!   ([`SniperStore`])
//! - **Trainer**: the epoch loop that swaps masks, restores re-activated
//!   weights, and scales learning rates ([`SniperTrainer`])
//!
//! # Example
//!
//! ```ignore
//! use podar::sniper::{SniperConfig, SniperTrainer, SparsitySchedule};
//! use std::collections::BTreeMap;
//!
//! let config = SniperConfig::new("runs/sniper").with_schedule(SparsitySchedule::Stepwise {
//!     milestones: BTreeMap::from([(0, 0.9), (20, 0.5), (40, 0.0)]),
//! });
//!
//! let mut trainer = SniperTrainer::new(model, optimizer, loss, train_config, config);
//! trainer.prepare(&calibration_batches, forward)?;
//! let result = trainer.run(60, batches, forward)?;
//! ```

mod callback;
mod config;
mod importance;
mod lr_scale;
mod mask;
mod schedule;
mod snapshot;
mod store;
mod trainer;

pub use callback::SparsityMonitor;
pub use config::SniperConfig;
pub use importance::{ImportanceScores, SnipCollector};
pub use lr_scale::{lr_scale, LrScaling, LrState};
pub use mask::{MaskSet, ParamSparsity, SparsityReport};
pub use schedule::SparsitySchedule;
pub use snapshot::InitSnapshot;
pub use store::SniperStore;
pub use trainer::SniperTrainer;
