//! Initial-value snapshots
//!
//! Weights that were masked out early in training re-enter later, once the
//! schedule relaxes. Restoring them to their initialization values (instead
//! of leaving them at zero) gives them a sane starting point.

use crate::io::Model;
use crate::sniper::mask::MaskSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named copy of parameter values captured before any pruning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitSnapshot {
    values: BTreeMap<String, Vec<f32>>,
}

impl InitSnapshot {
    /// Capture the current parameter values of `model`.
    pub fn capture(model: &Model) -> Self {
        let values = model
            .named_parameters()
            .map(|(name, tensor)| (name.to_string(), tensor.to_vec()))
            .collect();
        Self { values }
    }

    /// Snapshot values for one parameter.
    pub fn get(&self, name: &str) -> Option<&[f32]> {
        self.values.get(name).map(Vec::as_slice)
    }

    /// Number of captured parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Overwrite all parameters of `model` with the snapshot values.
    ///
    /// Parameters without a snapshot entry or with a different length are
    /// left untouched.
    pub fn apply_to(&self, model: &Model) {
        for (name, values) in &self.values {
            if let Some(param) = model.get_parameter(name) {
                if param.len() == values.len() {
                    let mut data = param.data_mut();
                    for (d, &v) in data.iter_mut().zip(values.iter()) {
                        *d = v;
                    }
                }
            }
        }
    }

    /// Restore weights that just became active after a sparsity transition.
    ///
    /// With `masks` present, a weight is restored when it is currently zero
    /// AND the new mask allows it. With `masks` absent (sparsity reached 0),
    /// every zero weight is restored.
    pub fn restore_newly_active(&self, model: &Model, masks: Option<&MaskSet>) {
        match masks {
            Some(masks) => {
                for (name, mask) in masks.iter() {
                    let (Some(param), Some(init)) = (model.get_parameter(name), self.get(name))
                    else {
                        continue;
                    };
                    if param.len() != mask.len() || init.len() != mask.len() {
                        continue;
                    }
                    let mut data = param.data_mut();
                    for ((value, &keep), &init_value) in
                        data.iter_mut().zip(mask.iter()).zip(init.iter())
                    {
                        if *value == 0.0 && keep {
                            *value = init_value;
                        }
                    }
                }
            }
            None => {
                for (name, init) in &self.values {
                    let Some(param) = model.get_parameter(name) else {
                        continue;
                    };
                    if param.len() != init.len() {
                        continue;
                    }
                    let mut data = param.data_mut();
                    for (value, &init_value) in data.iter_mut().zip(init.iter()) {
                        if *value == 0.0 {
                            *value = init_value;
                        }
                    }
                }
            }
        }
    }
}
