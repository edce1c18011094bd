//! Linear sparsity schedule methods.

use super::SparsitySchedule;

impl SparsitySchedule {
    /// Sparsity at a given epoch for the Linear schedule.
    pub(super) fn linear_sparsity_at_epoch(
        start_epoch: usize,
        end_epoch: usize,
        initial_sparsity: f32,
        final_sparsity: f32,
        epoch: usize,
    ) -> f32 {
        if epoch < start_epoch {
            initial_sparsity
        } else if epoch >= end_epoch {
            final_sparsity
        } else {
            let progress = (epoch - start_epoch) as f32 / (end_epoch - start_epoch) as f32;
            initial_sparsity + progress * (final_sparsity - initial_sparsity)
        }
    }

    /// Validate window and bounds shared by the interpolating schedules.
    pub(super) fn window_validate(
        start_epoch: usize,
        end_epoch: usize,
        initial_sparsity: f32,
        final_sparsity: f32,
    ) -> Result<(), String> {
        if end_epoch <= start_epoch {
            return Err(format!(
                "end_epoch ({end_epoch}) must be greater than start_epoch ({start_epoch})"
            ));
        }
        if !(0.0..1.0).contains(&initial_sparsity) {
            return Err(format!(
                "initial_sparsity ({initial_sparsity}) must be in [0.0, 1.0)"
            ));
        }
        if !(0.0..1.0).contains(&final_sparsity) {
            return Err(format!(
                "final_sparsity ({final_sparsity}) must be in [0.0, 1.0)"
            ));
        }
        if final_sparsity > initial_sparsity {
            return Err(format!(
                "sparsity must relax over time: final ({final_sparsity}) exceeds initial ({initial_sparsity})"
            ));
        }
        Ok(())
    }

    /// Distinct nonzero levels an interpolating schedule will request,
    /// one per epoch in the window.
    pub(super) fn window_levels(&self, start_epoch: usize, end_epoch: usize) -> Vec<f32> {
        let mut levels: Vec<f32> = (start_epoch..=end_epoch)
            .map(|e| self.sparsity_at_epoch(e))
            .filter(|&s| s > 0.0)
            .collect();
        levels.sort_by(f32::total_cmp);
        levels.dedup();
        levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> SparsitySchedule {
        SparsitySchedule::Linear {
            start_epoch: 2,
            end_epoch: 6,
            initial_sparsity: 0.8,
            final_sparsity: 0.0,
        }
    }

    #[test]
    fn test_linear_endpoints() {
        let s = schedule();
        assert_eq!(s.sparsity_at_epoch(0), 0.8);
        assert_eq!(s.sparsity_at_epoch(2), 0.8);
        assert_eq!(s.sparsity_at_epoch(6), 0.0);
        assert_eq!(s.sparsity_at_epoch(10), 0.0);
    }

    #[test]
    fn test_linear_midpoint() {
        let s = schedule();
        assert!((s.sparsity_at_epoch(4) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_linear_validate_rejects_growth() {
        let s = SparsitySchedule::Linear {
            start_epoch: 0,
            end_epoch: 5,
            initial_sparsity: 0.1,
            final_sparsity: 0.5,
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_linear_validate_rejects_empty_window() {
        let s = SparsitySchedule::Linear {
            start_epoch: 5,
            end_epoch: 5,
            initial_sparsity: 0.5,
            final_sparsity: 0.0,
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_linear_levels_are_distinct_and_nonzero() {
        let s = schedule();
        let levels = s.levels();
        assert!(!levels.is_empty());
        assert!(levels.iter().all(|&l| l > 0.0));
        assert!(levels.windows(2).all(|w| w[0] < w[1]));
    }
}
