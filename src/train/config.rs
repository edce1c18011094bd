//! Training configuration and metrics tracking

/// Configuration for the training loop
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Log progress every N steps
    pub log_interval: usize,

    /// Maximum global gradient norm (None disables clipping)
    pub max_grad_norm: Option<f32>,

    /// Accumulate gradients over N steps before each optimizer step
    pub gradient_accumulation_steps: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            log_interval: 10,
            max_grad_norm: None,
            gradient_accumulation_steps: 1,
        }
    }
}

impl TrainConfig {
    /// Create a config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the logging interval
    pub fn with_log_interval(mut self, interval: usize) -> Self {
        self.log_interval = interval;
        self
    }

    /// Enable gradient clipping at the given global norm
    pub fn with_grad_clip(mut self, max_norm: f32) -> Self {
        self.max_grad_norm = Some(max_norm);
        self
    }

    /// Set the number of gradient accumulation steps
    pub fn with_gradient_accumulation(mut self, steps: usize) -> Self {
        self.gradient_accumulation_steps = steps;
        self
    }
}

/// Tracks losses, learning rates, and counters across training
#[derive(Debug, Clone, Default)]
pub struct MetricsTracker {
    /// Completed epochs
    pub epoch: usize,
    /// Total optimizer steps taken
    pub steps: usize,
    /// Average loss per epoch
    pub losses: Vec<f32>,
    /// Learning rate per epoch
    pub lrs: Vec<f32>,
    /// Validation loss per validation run
    pub val_losses: Vec<f32>,
}

impl MetricsTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one training step
    pub fn increment_step(&mut self) {
        self.steps += 1;
    }

    /// Record an epoch's average loss and learning rate
    pub fn record_epoch(&mut self, loss: f32, lr: f32) {
        self.losses.push(loss);
        self.lrs.push(lr);
        self.epoch += 1;
    }

    /// Record a validation loss
    pub fn record_val_loss(&mut self, loss: f32) {
        self.val_losses.push(loss);
    }

    /// Most recent epoch loss
    pub fn last_loss(&self) -> Option<f32> {
        self.losses.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_train_config_defaults() {
        let config = TrainConfig::default();
        assert_eq!(config.log_interval, 10);
        assert!(config.max_grad_norm.is_none());
        assert_eq!(config.gradient_accumulation_steps, 1);
    }

    #[test]
    fn test_train_config_builder() {
        let config = TrainConfig::new()
            .with_log_interval(100)
            .with_grad_clip(1.0)
            .with_gradient_accumulation(4);

        assert_eq!(config.log_interval, 100);
        assert_eq!(config.max_grad_norm, Some(1.0));
        assert_eq!(config.gradient_accumulation_steps, 4);
    }

    #[test]
    fn test_metrics_tracker() {
        let mut metrics = MetricsTracker::new();
        assert_eq!(metrics.epoch, 0);

        metrics.increment_step();
        metrics.increment_step();
        metrics.record_epoch(0.5, 0.01);
        metrics.record_val_loss(0.6);

        assert_eq!(metrics.steps, 2);
        assert_eq!(metrics.epoch, 1);
        assert_eq!(metrics.last_loss(), Some(0.5));
        assert_eq!(metrics.val_losses, vec![0.6]);
    }
}
