//! Type definitions for sparsity schedules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sparsity schedule defining how sparsity relaxes during training.
///
/// Training starts with most weights masked out and the schedule lowers the
/// sparsity level as epochs pass, letting more of the network participate
/// over time.
///
/// # Variants
///
/// - `Stepwise`: explicit epoch → sparsity milestones
/// - `Linear`: linear interpolation from initial down to final sparsity
/// - `Cubic`: cubic decay, fast relaxation early that slows near the target
///
/// # Example
///
/// ```
/// use podar::sniper::SparsitySchedule;
/// use std::collections::BTreeMap;
///
/// let schedule = SparsitySchedule::Stepwise {
///     milestones: BTreeMap::from([(0, 0.9), (10, 0.5), (20, 0.0)]),
/// };
/// assert_eq!(schedule.sparsity_at_epoch(0), 0.9);
/// assert_eq!(schedule.sparsity_at_epoch(12), 0.5);
/// assert_eq!(schedule.sparsity_at_epoch(25), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SparsitySchedule {
    /// Explicit epoch → sparsity map. The value at an epoch is the most
    /// recent milestone at or before it.
    Stepwise {
        /// Epoch → sparsity fraction. Must contain epoch 0 and be
        /// non-increasing in epoch.
        milestones: BTreeMap<usize, f32>,
    },

    /// Linearly decrease sparsity between two epochs.
    Linear {
        /// Epoch the decay begins.
        start_epoch: usize,
        /// Epoch at which final sparsity is reached.
        end_epoch: usize,
        /// Sparsity before and at `start_epoch`.
        initial_sparsity: f32,
        /// Sparsity at and after `end_epoch`.
        final_sparsity: f32,
    },

    /// Cubic sparsity decay.
    ///
    /// Formula: `s(t) = s_f + (s_i - s_f) * (1 - p)^3` with `p` the progress
    /// through the window. Sparsity drops quickly at first, then approaches
    /// the final level slowly so late epochs train a near-final network.
    Cubic {
        /// Epoch the decay begins.
        start_epoch: usize,
        /// Epoch at which final sparsity is reached.
        end_epoch: usize,
        /// Sparsity before and at `start_epoch`.
        initial_sparsity: f32,
        /// Sparsity at and after `end_epoch`.
        final_sparsity: f32,
    },
}

impl Default for SparsitySchedule {
    fn default() -> Self {
        SparsitySchedule::Stepwise {
            milestones: BTreeMap::from([(0, 0.0)]),
        }
    }
}
