//! # podar
//!
//! Progressive-sparsity training: accelerate the early epochs by masking out
//! most of the network, then relax the sparsity on a schedule until the full
//! model trains.
//!
//! The crate provides:
//!
//! - [`sniper`] — the sparsity machinery: schedules, importance scoring,
//!   masks, the artifact store, and [`sniper::SniperTrainer`]
//! - [`train`] — the training loop the sparsity machinery hooks into
//!   (trainer, losses, callbacks, metrics)
//! - [`optim`] — optimizers and learning-rate schedulers
//! - [`autograd`] — the minimal gradient tape driving backward passes
//! - [`io`] — named-parameter model persistence (JSON/YAML)
//! - [`cli`] — the `podar` binary surface
//!
//! # Example
//!
//! ```no_run
//! use podar::autograd::mul;
//! use podar::io::{Model, ModelMetadata};
//! use podar::optim::SGD;
//! use podar::sniper::{SniperConfig, SniperTrainer, SparsitySchedule};
//! use podar::train::{Batch, MSELoss, TrainConfig};
//! use podar::Tensor;
//! use std::collections::BTreeMap;
//!
//! # fn main() -> podar::Result<()> {
//! let weight = Tensor::from_vec(vec![0.5; 64], true);
//! let model = Model::new(
//!     ModelMetadata::new("demo", "linear"),
//!     vec![("weight".to_string(), weight.clone())],
//! );
//!
//! // Start 90% sparse, relax to dense by epoch 20
//! let config = SniperConfig::new("runs/demo").with_schedule(SparsitySchedule::Stepwise {
//!     milestones: BTreeMap::from([(0, 0.9), (10, 0.5), (20, 0.0)]),
//! });
//!
//! let mut trainer = SniperTrainer::new(
//!     model,
//!     Box::new(SGD::new(0.01, 0.9)),
//!     Box::new(MSELoss),
//!     TrainConfig::default(),
//!     config,
//! );
//!
//! let batches = vec![Batch::new(
//!     Tensor::from_vec(vec![1.0; 64], false),
//!     Tensor::from_vec(vec![2.0; 64], false),
//! )];
//!
//! let w = weight.clone();
//! trainer.prepare(&batches, move |x| mul(&w, x))?;
//!
//! let w = weight.clone();
//! let result = trainer.run(30, || batches.clone(), move |x| mul(&w, x))?;
//! println!("final loss {:.4}", result.final_loss);
//! # Ok(())
//! # }
//! ```

pub mod autograd;
pub mod cli;
mod error;
pub mod io;
pub mod optim;
pub mod sniper;
pub mod train;

pub use autograd::Tensor;
pub use error::{Error, Result};
