//! Stepwise sparsity schedule methods.

use std::collections::BTreeMap;

use super::SparsitySchedule;

impl SparsitySchedule {
    /// Sparsity at a given epoch for the Stepwise schedule: the most recent
    /// milestone at or before the epoch.
    pub(super) fn stepwise_sparsity_at_epoch(milestones: &BTreeMap<usize, f32>, epoch: usize) -> f32 {
        milestones
            .range(..=epoch)
            .next_back()
            .map(|(_, &s)| s)
            .unwrap_or(0.0)
    }

    /// Distinct nonzero sparsity levels for the Stepwise schedule.
    pub(super) fn stepwise_levels(milestones: &BTreeMap<usize, f32>) -> Vec<f32> {
        let mut levels: Vec<f32> = milestones.values().copied().filter(|&s| s > 0.0).collect();
        levels.sort_by(f32::total_cmp);
        levels.dedup();
        levels
    }

    /// Validate the Stepwise schedule.
    pub(super) fn stepwise_validate(milestones: &BTreeMap<usize, f32>) -> Result<(), String> {
        if milestones.is_empty() {
            return Err("milestones must not be empty".to_string());
        }
        if !milestones.contains_key(&0) {
            return Err("milestones must contain epoch 0".to_string());
        }

        let mut prev: Option<f32> = None;
        for (&epoch, &sparsity) in milestones {
            if !(0.0..1.0).contains(&sparsity) {
                return Err(format!(
                    "sparsity {sparsity} at epoch {epoch} must be in [0.0, 1.0)"
                ));
            }
            if let Some(p) = prev {
                if sparsity > p {
                    return Err(format!(
                        "sparsity must not increase: epoch {epoch} has {sparsity} after {p}"
                    ));
                }
            }
            prev = Some(sparsity);
        }
        Ok(())
    }

    /// Whether the Stepwise schedule has passed its last milestone.
    pub(super) fn stepwise_is_complete(milestones: &BTreeMap<usize, f32>, epoch: usize) -> bool {
        milestones.keys().next_back().is_some_and(|&last| epoch > last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> SparsitySchedule {
        SparsitySchedule::Stepwise {
            milestones: BTreeMap::from([(0, 0.9), (5, 0.5), (10, 0.0)]),
        }
    }

    #[test]
    fn test_stepwise_lookup_between_milestones() {
        let s = schedule();
        assert_eq!(s.sparsity_at_epoch(0), 0.9);
        assert_eq!(s.sparsity_at_epoch(4), 0.9);
        assert_eq!(s.sparsity_at_epoch(5), 0.5);
        assert_eq!(s.sparsity_at_epoch(9), 0.5);
        assert_eq!(s.sparsity_at_epoch(10), 0.0);
        assert_eq!(s.sparsity_at_epoch(100), 0.0);
    }

    #[test]
    fn test_stepwise_levels_skip_zero() {
        let s = schedule();
        assert_eq!(s.levels(), vec![0.5, 0.9]);
    }

    #[test]
    fn test_stepwise_validate_requires_epoch_zero() {
        let s = SparsitySchedule::Stepwise {
            milestones: BTreeMap::from([(3, 0.5)]),
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_stepwise_validate_rejects_increase() {
        let s = SparsitySchedule::Stepwise {
            milestones: BTreeMap::from([(0, 0.5), (5, 0.9)]),
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_stepwise_validate_rejects_full_sparsity() {
        let s = SparsitySchedule::Stepwise {
            milestones: BTreeMap::from([(0, 1.0)]),
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_stepwise_is_complete() {
        let s = schedule();
        assert!(!s.is_complete(10));
        assert!(s.is_complete(11));
    }
}
