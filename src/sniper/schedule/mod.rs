//! Sparsity schedule definitions
//!
//! Defines how weight sparsity evolves during training. All schedules start
//! at their highest sparsity and relax downward:
//! - Stepwise: explicit epoch → sparsity milestones
//! - Linear: straight-line interpolation down to the final level
//! - Cubic: fast relaxation early, slow approach to the final level

mod cubic;
mod linear;
mod stepwise;
mod types;

#[cfg(test)]
mod proptests;

pub use types::SparsitySchedule;

impl SparsitySchedule {
    /// Compute the target sparsity at a given training epoch.
    ///
    /// # Returns
    ///
    /// Target sparsity as a value in `[0.0, 1.0)`. Defined for every epoch:
    /// epochs before the schedule window return the initial sparsity, epochs
    /// after it return the final sparsity.
    pub fn sparsity_at_epoch(&self, epoch: usize) -> f32 {
        match self {
            SparsitySchedule::Stepwise { milestones } => {
                Self::stepwise_sparsity_at_epoch(milestones, epoch)
            }
            SparsitySchedule::Linear {
                start_epoch,
                end_epoch,
                initial_sparsity,
                final_sparsity,
            } => Self::linear_sparsity_at_epoch(
                *start_epoch,
                *end_epoch,
                *initial_sparsity,
                *final_sparsity,
                epoch,
            ),
            SparsitySchedule::Cubic {
                start_epoch,
                end_epoch,
                initial_sparsity,
                final_sparsity,
            } => Self::cubic_sparsity_at_epoch(
                *start_epoch,
                *end_epoch,
                *initial_sparsity,
                *final_sparsity,
                epoch,
            ),
        }
    }

    /// Whether the target sparsity changes when entering this epoch.
    ///
    /// Epoch 0 is never a transition: the initial level is applied during
    /// setup, not as a mid-training switch.
    pub fn is_transition_epoch(&self, epoch: usize) -> bool {
        if epoch == 0 {
            return false;
        }
        self.sparsity_at_epoch(epoch) != self.sparsity_at_epoch(epoch - 1)
    }

    /// Every distinct nonzero sparsity level this schedule will request,
    /// in ascending order. Used to precompute one mask set per level.
    pub fn levels(&self) -> Vec<f32> {
        match self {
            SparsitySchedule::Stepwise { milestones } => Self::stepwise_levels(milestones),
            SparsitySchedule::Linear {
                start_epoch,
                end_epoch,
                ..
            }
            | SparsitySchedule::Cubic {
                start_epoch,
                end_epoch,
                ..
            } => self.window_levels(*start_epoch, *end_epoch),
        }
    }

    /// Sparsity at the start of training.
    pub fn initial_sparsity(&self) -> f32 {
        self.sparsity_at_epoch(0)
    }

    /// Sparsity once the schedule has fully relaxed.
    pub fn final_sparsity(&self) -> f32 {
        match self {
            SparsitySchedule::Stepwise { milestones } => {
                milestones.values().next_back().copied().unwrap_or(0.0)
            }
            SparsitySchedule::Linear { final_sparsity, .. }
            | SparsitySchedule::Cubic { final_sparsity, .. } => *final_sparsity,
        }
    }

    /// Epoch of the last scheduled change.
    pub fn last_transition_epoch(&self) -> usize {
        match self {
            SparsitySchedule::Stepwise { milestones } => {
                milestones.keys().next_back().copied().unwrap_or(0)
            }
            SparsitySchedule::Linear { end_epoch, .. }
            | SparsitySchedule::Cubic { end_epoch, .. } => *end_epoch,
        }
    }

    /// Whether the schedule has no further transitions after this epoch.
    pub fn is_complete(&self, epoch: usize) -> bool {
        match self {
            SparsitySchedule::Stepwise { milestones } => {
                Self::stepwise_is_complete(milestones, epoch)
            }
            SparsitySchedule::Linear { end_epoch, .. }
            | SparsitySchedule::Cubic { end_epoch, .. } => epoch > *end_epoch,
        }
    }

    /// Check that the schedule is well-formed.
    ///
    /// # Errors
    ///
    /// Returns an error message if sparsity values leave `[0.0, 1.0)`, the
    /// epoch window is empty, or the schedule would increase sparsity.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            SparsitySchedule::Stepwise { milestones } => Self::stepwise_validate(milestones),
            SparsitySchedule::Linear {
                start_epoch,
                end_epoch,
                initial_sparsity,
                final_sparsity,
            }
            | SparsitySchedule::Cubic {
                start_epoch,
                end_epoch,
                initial_sparsity,
                final_sparsity,
            } => Self::window_validate(
                *start_epoch,
                *end_epoch,
                *initial_sparsity,
                *final_sparsity,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_default_schedule_is_dense() {
        let schedule = SparsitySchedule::default();
        assert_eq!(schedule.sparsity_at_epoch(0), 0.0);
        assert!(schedule.levels().is_empty());
        assert!(schedule.validate().is_ok());
    }

    #[test]
    fn test_transition_epochs_stepwise() {
        let s = SparsitySchedule::Stepwise {
            milestones: BTreeMap::from([(0, 0.9), (3, 0.5), (6, 0.0)]),
        };
        assert!(!s.is_transition_epoch(0));
        assert!(!s.is_transition_epoch(2));
        assert!(s.is_transition_epoch(3));
        assert!(!s.is_transition_epoch(4));
        assert!(s.is_transition_epoch(6));
        assert!(!s.is_transition_epoch(7));
    }

    #[test]
    fn test_initial_and_final_sparsity() {
        let s = SparsitySchedule::Linear {
            start_epoch: 0,
            end_epoch: 4,
            initial_sparsity: 0.75,
            final_sparsity: 0.25,
        };
        assert_eq!(s.initial_sparsity(), 0.75);
        assert_eq!(s.final_sparsity(), 0.25);
    }

    #[test]
    fn test_serde_roundtrip_stepwise() {
        let s = SparsitySchedule::Stepwise {
            milestones: BTreeMap::from([(0, 0.9), (10, 0.0)]),
        };
        let json = serde_json::to_string(&s).unwrap();
        let back: SparsitySchedule = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }

    #[test]
    fn test_serde_yaml_tagged() {
        let yaml = "type: cubic\nstart_epoch: 0\nend_epoch: 8\ninitial_sparsity: 0.9\nfinal_sparsity: 0.1\n";
        let s: SparsitySchedule = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(s.initial_sparsity(), 0.9);
        assert!(s.validate().is_ok());
    }
}
