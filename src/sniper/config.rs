//! Sniper training configuration.

use crate::sniper::lr_scale::LrScaling;
use crate::sniper::schedule::SparsitySchedule;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_exclude() -> Vec<String> {
    vec!["embed".to_string(), "norm".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_max_lr_scaling() -> f32 {
    2.0
}

fn default_max_param_sparsity() -> f32 {
    1.0
}

/// Configuration for progressive-sparsity training.
///
/// # Example
///
/// ```
/// use podar::sniper::{SniperConfig, SparsitySchedule};
/// use std::collections::BTreeMap;
///
/// let config = SniperConfig::new("runs/sniper")
///     .with_schedule(SparsitySchedule::Stepwise {
///         milestones: BTreeMap::from([(0, 0.9), (10, 0.5), (20, 0.0)]),
///     })
///     .with_max_lr_scaling(4.0);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SniperConfig {
    /// Directory for masks, importance scores, and the init snapshot.
    dir: PathBuf,

    /// How sparsity relaxes over epochs.
    #[serde(default)]
    schedule: SparsitySchedule,

    /// Parameters whose names contain any of these substrings are never
    /// pruned.
    #[serde(default = "default_exclude")]
    exclude_params: Vec<String>,

    /// Re-apply masks after every optimizer step.
    #[serde(default = "default_true")]
    forward_mask: bool,

    /// Also zero out masked gradients before the optimizer step.
    #[serde(default)]
    mask_gradients: bool,

    /// Learning-rate scaling mode.
    #[serde(default)]
    lr_scaling: LrScaling,

    /// Ceiling for the LR scale factor.
    #[serde(default = "default_max_lr_scaling")]
    max_lr_scaling: f32,

    /// Per-parameter sparsity ceiling.
    #[serde(default = "default_max_param_sparsity")]
    max_param_sparsity: f32,

    /// Restore newly activated weights to their initial values when sparsity
    /// relaxes (otherwise they restart from zero).
    #[serde(default = "default_true")]
    restore_init_values: bool,
}

impl SniperConfig {
    /// Create a configuration storing artifacts under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            schedule: SparsitySchedule::default(),
            exclude_params: default_exclude(),
            forward_mask: true,
            mask_gradients: false,
            lr_scaling: LrScaling::default(),
            max_lr_scaling: default_max_lr_scaling(),
            max_param_sparsity: default_max_param_sparsity(),
            restore_init_values: true,
        }
    }

    /// Set the sparsity schedule.
    pub fn with_schedule(mut self, schedule: SparsitySchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Set the exclusion list.
    pub fn with_exclude_params(mut self, exclude: Vec<String>) -> Self {
        self.exclude_params = exclude;
        self
    }

    /// Enable or disable mask re-application after each step.
    pub fn with_forward_mask(mut self, enabled: bool) -> Self {
        self.forward_mask = enabled;
        self
    }

    /// Enable or disable gradient masking.
    pub fn with_mask_gradients(mut self, enabled: bool) -> Self {
        self.mask_gradients = enabled;
        self
    }

    /// Set the learning-rate scaling mode.
    pub fn with_lr_scaling(mut self, mode: LrScaling) -> Self {
        self.lr_scaling = mode;
        self
    }

    /// Set the LR scale ceiling.
    pub fn with_max_lr_scaling(mut self, max: f32) -> Self {
        self.max_lr_scaling = max;
        self
    }

    /// Set the per-parameter sparsity ceiling.
    pub fn with_max_param_sparsity(mut self, max: f32) -> Self {
        self.max_param_sparsity = max;
        self
    }

    /// Enable or disable init-value restoration.
    pub fn with_restore_init_values(mut self, enabled: bool) -> Self {
        self.restore_init_values = enabled;
        self
    }

    /// The artifact directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The sparsity schedule.
    pub fn schedule(&self) -> &SparsitySchedule {
        &self.schedule
    }

    /// The exclusion list.
    pub fn exclude_params(&self) -> &[String] {
        &self.exclude_params
    }

    /// Whether masks are re-applied after each step.
    pub fn forward_mask(&self) -> bool {
        self.forward_mask
    }

    /// Whether gradients are masked.
    pub fn mask_gradients(&self) -> bool {
        self.mask_gradients
    }

    /// The learning-rate scaling mode.
    pub fn lr_scaling(&self) -> LrScaling {
        self.lr_scaling
    }

    /// The LR scale ceiling.
    pub fn max_lr_scaling(&self) -> f32 {
        self.max_lr_scaling
    }

    /// The per-parameter sparsity ceiling.
    pub fn max_param_sparsity(&self) -> f32 {
        self.max_param_sparsity
    }

    /// Whether newly activated weights are restored from the snapshot.
    pub fn restore_init_values(&self) -> bool {
        self.restore_init_values
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error message for an invalid schedule, an empty directory,
    /// or out-of-range ceilings.
    pub fn validate(&self) -> Result<(), String> {
        self.schedule.validate()?;

        if self.dir.as_os_str().is_empty() {
            return Err("dir must not be empty".to_string());
        }
        if !(0.0..=1.0).contains(&self.max_param_sparsity) || self.max_param_sparsity == 0.0 {
            return Err(format!(
                "max_param_sparsity ({}) must be in (0.0, 1.0]",
                self.max_param_sparsity
            ));
        }
        if self.max_lr_scaling < 1.0 {
            return Err(format!(
                "max_lr_scaling ({}) must be at least 1.0",
                self.max_lr_scaling
            ));
        }
        Ok(())
    }
}
