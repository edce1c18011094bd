//! High-level training loop
//!
//! This module provides the training framework the sparsity machinery hooks
//! into:
//! - Loss functions (MSE, L1)
//! - Trainer abstraction with step/epoch/multi-epoch loops
//! - Training configuration and metrics tracking
//! - Callback system (progress, early stopping, LR scheduling)
//!
//! # Example
//!
//! ```no_run
//! use podar::train::{Trainer, TrainConfig, MSELoss};
//! use podar::optim::Adam;
//! use podar::Tensor;
//!
//! let params = vec![Tensor::zeros(10, true)];
//! let optimizer = Adam::new(0.001, 0.9, 0.999, 1e-8);
//!
//! let mut trainer = Trainer::new(params, Box::new(optimizer), TrainConfig::default());
//! trainer.set_loss(Box::new(MSELoss));
//! ```

mod batch;
pub mod callback;
mod config;
mod loss;
mod trainer;

pub use batch::Batch;
pub use callback::{
    CallbackAction, CallbackContext, CallbackManager, EarlyStopping, LRSchedulerCallback,
    ProgressCallback, TrainerCallback,
};
pub use config::{MetricsTracker, TrainConfig};
pub use loss::{L1Loss, LossFn, MSELoss};
pub use trainer::{TrainResult, Trainer};
