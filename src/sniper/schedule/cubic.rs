//! Cubic sparsity schedule methods.

use super::SparsitySchedule;

impl SparsitySchedule {
    /// Sparsity at a given epoch for the Cubic schedule.
    /// Formula: s(t) = s_f + (s_i - s_f) * (1 - p)^3
    pub(super) fn cubic_sparsity_at_epoch(
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
            let t = (epoch - start_epoch) as f32;
            let total = (end_epoch - start_epoch) as f32;
            let remaining = 1.0 - t / total;
            final_sparsity + (initial_sparsity - final_sparsity) * remaining.powi(3)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> SparsitySchedule {
        SparsitySchedule::Cubic {
            start_epoch: 0,
            end_epoch: 10,
            initial_sparsity: 0.9,
            final_sparsity: 0.1,
        }
    }

    #[test]
    fn test_cubic_endpoints() {
        let s = schedule();
        assert_eq!(s.sparsity_at_epoch(0), 0.9);
        assert_eq!(s.sparsity_at_epoch(10), 0.1);
        assert_eq!(s.sparsity_at_epoch(50), 0.1);
    }

    #[test]
    fn test_cubic_drops_fast_early() {
        let s = schedule();
        let early_drop = s.sparsity_at_epoch(0) - s.sparsity_at_epoch(2);
        let late_drop = s.sparsity_at_epoch(8) - s.sparsity_at_epoch(10);
        assert!(early_drop > late_drop);
    }

    #[test]
    fn test_cubic_monotone_decay() {
        let s = schedule();
        let mut prev = s.sparsity_at_epoch(0);
        for epoch in 1..=10 {
            let cur = s.sparsity_at_epoch(epoch);
            assert!(cur <= prev + 1e-6);
            prev = cur;
        }
    }

    #[test]
    fn test_cubic_validate_bounds() {
        let s = SparsitySchedule::Cubic {
            start_epoch: 0,
            end_epoch: 10,
            initial_sparsity: 1.2,
            final_sparsity: 0.0,
        };
        assert!(s.validate().is_err());
    }
}
