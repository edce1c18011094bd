//! Property-based tests for sparsity schedules.

use super::SparsitySchedule;
use proptest::prelude::*;
use std::collections::BTreeMap;

fn linear_schedule() -> impl Strategy<Value = SparsitySchedule> {
    (0usize..100, 1usize..200, 0.5f32..0.95, 0.0f32..0.5).prop_map(
        |(start, duration, initial, final_val)| SparsitySchedule::Linear {
            start_epoch: start,
            end_epoch: start + duration,
            initial_sparsity: initial,
            final_sparsity: final_val,
        },
    )
}

fn cubic_schedule() -> impl Strategy<Value = SparsitySchedule> {
    (0usize..100, 1usize..200, 0.5f32..0.95, 0.0f32..0.5).prop_map(
        |(start, duration, initial, final_val)| SparsitySchedule::Cubic {
            start_epoch: start,
            end_epoch: start + duration,
            initial_sparsity: initial,
            final_sparsity: final_val,
        },
    )
}

fn stepwise_schedule() -> impl Strategy<Value = SparsitySchedule> {
    proptest::collection::vec((1usize..100, 0.0f32..0.95), 0..6).prop_map(|extra| {
        // Sort descending by sparsity so later epochs never increase
        let mut values: Vec<f32> = extra.iter().map(|&(_, s)| s).collect();
        values.sort_by(|a, b| b.total_cmp(a));

        let mut epochs: Vec<usize> = extra.iter().map(|&(e, _)| e).collect();
        epochs.sort_unstable();
        epochs.dedup();

        let mut milestones = BTreeMap::from([(0, 0.95f32)]);
        for (epoch, value) in epochs.into_iter().zip(values) {
            milestones.insert(epoch, value);
        }
        SparsitySchedule::Stepwise { milestones }
    })
}

fn any_schedule() -> impl Strategy<Value = SparsitySchedule> {
    prop_oneof![linear_schedule(), cubic_schedule(), stepwise_schedule()]
}

proptest! {
    /// Sparsity never increases as training proceeds
    #[test]
    fn sparsity_is_monotone_decreasing(schedule in any_schedule(), span in 1usize..400) {
        prop_assume!(schedule.validate().is_ok());

        let mut prev = schedule.sparsity_at_epoch(0);
        for epoch in 1..span {
            let s = schedule.sparsity_at_epoch(epoch);
            prop_assert!(s <= prev + 1e-5, "epoch {} rose from {} to {}", epoch, prev, s);
            prev = s;
        }
    }

    /// The level at the start of training bounds every later level
    #[test]
    fn start_sparsity_is_maximal(schedule in any_schedule(), epoch in 0usize..400) {
        prop_assume!(schedule.validate().is_ok());
        prop_assert!(schedule.sparsity_at_epoch(0) >= schedule.sparsity_at_epoch(epoch) - 1e-6);
    }

    /// Sparsity stays inside [final, initial] and [0, 1)
    #[test]
    fn sparsity_is_bounded(schedule in any_schedule(), epoch in 0usize..400) {
        prop_assume!(schedule.validate().is_ok());

        let s = schedule.sparsity_at_epoch(epoch);
        prop_assert!(s >= schedule.final_sparsity() - 1e-6);
        prop_assert!(s <= schedule.initial_sparsity() + 1e-6);
        prop_assert!((0.0..1.0).contains(&s));
    }

    /// Every nonzero level the schedule produces appears in levels()
    #[test]
    fn levels_cover_produced_values(schedule in any_schedule(), epoch in 0usize..400) {
        prop_assume!(schedule.validate().is_ok());

        let s = schedule.sparsity_at_epoch(epoch);
        if s > 0.0 {
            prop_assert!(schedule.levels().iter().any(|&l| (l - s).abs() < 1e-6));
        }
    }

    /// Serialize/deserialize roundtrip
    #[test]
    fn serde_roundtrip(schedule in any_schedule()) {
        let json = serde_json::to_string(&schedule).unwrap();
        let back: SparsitySchedule = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(schedule, back);
    }
}
