//! Mask construction and application

use crate::io::Model;
use crate::sniper::importance::{is_excluded, ImportanceScores};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Seed for the deterministic back-fill of degenerate masks.
const BACKFILL_SEED: u64 = 0;

/// Per-parameter keep-masks (`true` = weight survives).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskSet {
    masks: BTreeMap<String, Vec<bool>>,
}

impl MaskSet {
    /// Build masks achieving `sparsity` globally across all scored weights.
    ///
    /// The threshold is the k-th smallest importance value over the flattened
    /// scores (`k = ⌊sparsity · total⌋`); weights strictly above it survive.
    /// If any single parameter ends up sparser than `max_param_sparsity`, it
    /// is re-thresholded locally at that cap; a parameter whose capped mask
    /// still keeps nothing (uniform scores) is back-filled to the cap density
    /// with a seeded shuffle.
    ///
    /// # Arguments
    ///
    /// * `scores` - Importance magnitudes per parameter
    /// * `sparsity` - Global fraction of weights to prune, in `[0.0, 1.0)`
    /// * `max_param_sparsity` - Per-parameter sparsity ceiling, in `(0.0, 1.0]`
    pub fn from_importance(
        scores: &ImportanceScores,
        sparsity: f32,
        max_param_sparsity: f32,
    ) -> Self {
        let sparsity = sparsity.clamp(0.0, 1.0);
        let total = scores.total_elements();
        let k = (sparsity * total as f32).floor() as usize;

        if k == 0 {
            let masks = scores
                .iter()
                .map(|(name, values)| (name.to_string(), vec![true; values.len()]))
                .collect();
            return Self { masks };
        }

        let threshold = {
            let mut flattened: Vec<f32> = scores.iter().flat_map(|(_, v)| v.iter().copied()).collect();
            kth_smallest(&mut flattened, k)
        };

        let mut masks = BTreeMap::new();
        for (name, values) in scores.iter() {
            let mut mask: Vec<bool> = values.iter().map(|&v| v > threshold).collect();
            cap_param_sparsity(&mut mask, values, max_param_sparsity);
            masks.insert(name.to_string(), mask);
        }

        Self { masks }
    }

    /// Zero out masked weights of `model` (parameters without a mask are
    /// untouched).
    pub fn apply(&self, model: &Model) {
        for (name, mask) in &self.masks {
            if let Some(param) = model.get_parameter(name) {
                let mut data = param.data_mut();
                for (value, &keep) in data.iter_mut().zip(mask.iter()) {
                    if !keep {
                        *value = 0.0;
                    }
                }
            }
        }
    }

    /// Zero out masked gradients of `model`.
    pub fn mask_grads(&self, model: &Model) {
        for (name, mask) in &self.masks {
            if let Some(param) = model.get_parameter(name) {
                if let Some(mut grad) = param.grad() {
                    for (g, &keep) in grad.iter_mut().zip(mask.iter()) {
                        if !keep {
                            *g = 0.0;
                        }
                    }
                    param.set_grad(grad);
                }
            }
        }
    }

    /// Drop masks for parameters matching the exclusion list.
    pub fn retain_eligible(&mut self, exclude_params: &[String]) {
        self.masks.retain(|name, _| !is_excluded(name, exclude_params));
    }

    /// Mask for one parameter.
    pub fn get(&self, name: &str) -> Option<&[bool]> {
        self.masks.get(name).map(Vec::as_slice)
    }

    /// Iterate over named masks.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[bool])> {
        self.masks.iter().map(|(n, m)| (n.as_str(), m.as_slice()))
    }

    /// Number of masked parameters.
    pub fn len(&self) -> usize {
        self.masks.len()
    }

    /// Whether the set holds no masks.
    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    /// Fraction of surviving weights for one parameter.
    pub fn density(&self, name: &str) -> Option<f32> {
        self.masks.get(name).map(|mask| {
            if mask.is_empty() {
                return 0.0;
            }
            mask.iter().filter(|&&keep| keep).count() as f32 / mask.len() as f32
        })
    }

    /// Overall fraction of pruned weights across all masks.
    pub fn sparsity(&self) -> f32 {
        let total: usize = self.masks.values().map(Vec::len).sum();
        if total == 0 {
            return 0.0;
        }
        let pruned: usize = self
            .masks
            .values()
            .map(|m| m.iter().filter(|&&keep| !keep).count())
            .sum();
        pruned as f32 / total as f32
    }
}

/// k-th smallest value, 1-indexed. `k` must be in `1..=values.len()`.
fn kth_smallest(values: &mut [f32], k: usize) -> f32 {
    let idx = k.min(values.len()) - 1;
    let (_, kth, _) = values.select_nth_unstable_by(idx, f32::total_cmp);
    *kth
}

/// Re-threshold a parameter whose sparsity exceeds the ceiling.
fn cap_param_sparsity(mask: &mut [bool], values: &[f32], max_param_sparsity: f32) {
    let numel = mask.len();
    if numel == 0 {
        return;
    }

    let nonzero = mask.iter().filter(|&&keep| keep).count();
    let param_sparsity = 1.0 - nonzero as f32 / numel as f32;
    if param_sparsity <= max_param_sparsity {
        return;
    }

    // Local threshold pruning at most ⌊cap · numel⌋ weights
    let num_pruned = (max_param_sparsity * numel as f32).floor() as usize;
    if num_pruned == 0 {
        mask.fill(true);
        return;
    }
    let mut sorted = values.to_vec();
    let threshold = kth_smallest(&mut sorted, num_pruned);
    for (m, &v) in mask.iter_mut().zip(values.iter()) {
        *m = v > threshold;
    }

    // Uniform scores defeat thresholding; back-fill deterministically
    let nonzero = mask.iter().filter(|&&keep| keep).count();
    if nonzero == 0 && max_param_sparsity < 1.0 {
        for (i, m) in mask.iter_mut().enumerate() {
            *m = i >= num_pruned;
        }
        let mut rng = StdRng::seed_from_u64(BACKFILL_SEED);
        mask.shuffle(&mut rng);
    }
}
