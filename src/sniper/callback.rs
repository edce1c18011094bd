//! Sparsity monitoring callback

use crate::sniper::schedule::SparsitySchedule;
use crate::train::callback::{CallbackAction, CallbackContext, TrainerCallback};

/// Callback that logs sparsity transitions during training.
///
/// Validates the schedule at training start and prints a line whenever the
/// active sparsity level changes.
///
/// # Example
///
/// ```ignore
/// use podar::sniper::SparsityMonitor;
///
/// trainer.add_callback(SparsityMonitor::new(config.schedule().clone()));
/// ```
#[derive(Debug, Clone)]
pub struct SparsityMonitor {
    schedule: SparsitySchedule,
    last_sparsity: f32,
}

impl SparsityMonitor {
    /// Create a monitor for a schedule.
    pub fn new(schedule: SparsitySchedule) -> Self {
        Self {
            schedule,
            last_sparsity: 0.0,
        }
    }

    /// Sparsity level seen most recently.
    pub fn last_sparsity(&self) -> f32 {
        self.last_sparsity
    }
}

impl TrainerCallback for SparsityMonitor {
    fn on_train_begin(&mut self, ctx: &CallbackContext) -> CallbackAction {
        if let Err(e) = self.schedule.validate() {
            eprintln!("[SparsityMonitor] Invalid sparsity schedule: {e}");
            return CallbackAction::Stop;
        }
        self.last_sparsity = ctx.sparsity;
        if ctx.sparsity > 0.0 {
            eprintln!(
                "[SparsityMonitor] Starting at sparsity {:.1}%",
                ctx.sparsity * 100.0
            );
        }
        CallbackAction::Continue
    }

    fn on_epoch_begin(&mut self, ctx: &CallbackContext) -> CallbackAction {
        if ctx.sparsity != self.last_sparsity {
            eprintln!(
                "[SparsityMonitor] Epoch {}: sparsity {:.1}% -> {:.1}%",
                ctx.epoch,
                self.last_sparsity * 100.0,
                ctx.sparsity * 100.0
            );
            self.last_sparsity = ctx.sparsity;
        }
        CallbackAction::Continue
    }

    fn on_train_end(&mut self, ctx: &CallbackContext) {
        eprintln!(
            "[SparsityMonitor] Training complete at sparsity {:.1}%",
            ctx.sparsity * 100.0
        );
    }

    fn name(&self) -> &'static str {
        "SparsityMonitor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn schedule() -> SparsitySchedule {
        SparsitySchedule::Stepwise {
            milestones: BTreeMap::from([(0, 0.9), (5, 0.0)]),
        }
    }

    #[test]
    fn test_monitor_validates_on_begin() {
        let bad = SparsitySchedule::Stepwise {
            milestones: BTreeMap::new(),
        };
        let mut monitor = SparsityMonitor::new(bad);
        assert_eq!(
            monitor.on_train_begin(&CallbackContext::default()),
            CallbackAction::Stop
        );

        let mut monitor = SparsityMonitor::new(schedule());
        assert_eq!(
            monitor.on_train_begin(&CallbackContext::default()),
            CallbackAction::Continue
        );
    }

    #[test]
    fn test_monitor_tracks_transitions() {
        let mut monitor = SparsityMonitor::new(schedule());
        let ctx = CallbackContext {
            sparsity: 0.9,
            ..Default::default()
        };
        monitor.on_train_begin(&ctx);
        assert_eq!(monitor.last_sparsity(), 0.9);

        let ctx = CallbackContext {
            epoch: 5,
            sparsity: 0.0,
            ..Default::default()
        };
        assert_eq!(monitor.on_epoch_begin(&ctx), CallbackAction::Continue);
        assert_eq!(monitor.last_sparsity(), 0.0);
    }
}
