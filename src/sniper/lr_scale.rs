//! Learning-rate scaling under sparsity
//!
//! A layer with most of its weights masked sees a much smaller effective
//! update per step, so the learning rate is scaled up with sparsity,
//! saturating at a configurable ceiling to keep gradients from exploding.

use crate::sniper::mask::MaskSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scale factor for a given sparsity: `min(max_scaling, 1 / (1 - sparsity))`.
///
/// Returns 1.0 for dense training and saturates at `max_scaling` as
/// sparsity approaches 1.
pub fn lr_scale(sparsity: f32, max_scaling: f32) -> f32 {
    if sparsity >= 1.0 {
        return max_scaling;
    }
    if sparsity <= 0.0 {
        return 1.0;
    }
    (1.0 / (1.0 - sparsity)).min(max_scaling)
}

/// How learning rates react to sparsity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LrScaling {
    /// No scaling.
    Off,
    /// One factor from the overall sparsity, applied to the optimizer LR.
    #[default]
    Global,
    /// A factor per parameter from its mask density, applied as a gradient
    /// scale before the optimizer step.
    PerParam,
}

/// Current scale factors, updated at each sparsity transition.
#[derive(Debug, Clone)]
pub struct LrState {
    global_factor: f32,
    param_factors: BTreeMap<String, f32>,
}

impl LrState {
    /// Dense state: all factors 1.
    pub fn new() -> Self {
        Self {
            global_factor: 1.0,
            param_factors: BTreeMap::new(),
        }
    }

    /// The global factor.
    pub fn global_factor(&self) -> f32 {
        self.global_factor
    }

    /// Factor for one parameter (1.0 when it has no dedicated factor).
    pub fn param_factor(&self, name: &str) -> f32 {
        self.param_factors.get(name).copied().unwrap_or(1.0)
    }

    /// Set the global factor from an overall sparsity level.
    pub fn update_global(&mut self, sparsity: f32, max_scaling: f32) {
        self.global_factor = lr_scale(sparsity, max_scaling);
        self.param_factors.clear();
    }

    /// Set per-parameter factors from the mask densities.
    pub fn update_per_param(&mut self, masks: &MaskSet, max_scaling: f32) {
        self.global_factor = 1.0;
        self.param_factors.clear();
        for (name, _) in masks.iter() {
            let density = masks.density(name).unwrap_or(1.0);
            self.param_factors
                .insert(name.to_string(), lr_scale(1.0 - density, max_scaling));
        }
    }

    /// Back to dense: all factors 1.
    pub fn reset(&mut self) {
        self.global_factor = 1.0;
        self.param_factors.clear();
    }
}

impl Default for LrState {
    fn default() -> Self {
        Self::new()
    }
}
