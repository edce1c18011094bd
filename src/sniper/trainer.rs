//! Progressive-sparsity trainer
//!
//! Wraps the training stack with the sparsity machinery: importance scoring
//! over calibration batches, mask precomputation per scheduled level, mask
//! swapping at epoch transitions, init-value restoration, and LR scaling.

use crate::io::Model;
use crate::optim::{clip_grad_norm, LRScheduler, Optimizer};
use crate::sniper::config::SniperConfig;
use crate::sniper::importance::{ImportanceScores, SnipCollector};
use crate::sniper::lr_scale::{LrScaling, LrState};
use crate::sniper::mask::{MaskSet, SparsityReport};
use crate::sniper::snapshot::InitSnapshot;
use crate::sniper::store::SniperStore;
use crate::train::callback::{CallbackAction, TrainerCallback};
use crate::train::{Batch, LossFn, TrainConfig, TrainResult, Trainer};
use crate::{Error, Result, Tensor};
use std::time::Instant;

/// Trainer that starts sparse and relaxes sparsity on a schedule.
///
/// # Example
///
/// ```no_run
/// use podar::io::{Model, ModelMetadata};
/// use podar::optim::SGD;
/// use podar::sniper::{SniperConfig, SniperTrainer, SparsitySchedule};
/// use podar::train::{Batch, MSELoss, TrainConfig};
/// use podar::autograd::mul;
/// use podar::Tensor;
/// use std::collections::BTreeMap;
///
/// let weight = Tensor::from_vec(vec![0.5; 8], true);
/// let model = Model::new(
///     ModelMetadata::new("demo", "linear"),
///     vec![("weight".to_string(), weight.clone())],
/// );
///
/// let config = SniperConfig::new("runs/demo").with_schedule(SparsitySchedule::Stepwise {
///     milestones: BTreeMap::from([(0, 0.75), (4, 0.25), (8, 0.0)]),
/// });
///
/// let mut trainer = SniperTrainer::new(
///     model,
///     Box::new(SGD::new(0.05, 0.0)),
///     Box::new(MSELoss),
///     TrainConfig::default(),
///     config,
/// );
///
/// let batches = vec![Batch::new(
///     Tensor::from_vec(vec![1.0; 8], false),
///     Tensor::from_vec(vec![2.0; 8], false),
/// )];
///
/// trainer.prepare(&batches, |x| mul(&weight, x)).unwrap();
/// let result = trainer.run(12, || batches.clone(), |x| mul(&weight, x)).unwrap();
/// assert_eq!(result.final_epoch, 12);
/// ```
pub struct SniperTrainer {
    trainer: Trainer,
    model: Model,
    config: SniperConfig,
    store: SniperStore,
    scheduler: Option<Box<dyn LRScheduler + Send>>,
    base_lr: f32,
    lr_state: LrState,
    masks: Option<MaskSet>,
    current_sparsity: f32,
    epoch: usize,
}

impl SniperTrainer {
    /// Create a sniper trainer around a named-parameter model.
    ///
    /// The trainer optimizes the model's parameter tensors directly (tensor
    /// clones share storage), so closures holding clones of the same
    /// parameters observe every update and mask application.
    pub fn new(
        model: Model,
        optimizer: Box<dyn Optimizer>,
        loss_fn: Box<dyn LossFn>,
        train_config: TrainConfig,
        config: SniperConfig,
    ) -> Self {
        let base_lr = optimizer.lr();
        let params: Vec<Tensor> = model.parameters.iter().map(|(_, t)| t.clone()).collect();

        let mut trainer = Trainer::new(params, optimizer, train_config);
        trainer.set_loss(loss_fn);

        let store = SniperStore::new(config.dir());

        Self {
            trainer,
            model,
            config,
            store,
            scheduler: None,
            base_lr,
            lr_state: LrState::new(),
            masks: None,
            current_sparsity: 0.0,
            epoch: 0,
        }
    }

    /// Attach a learning-rate scheduler, stepped once per epoch.
    ///
    /// The applied rate is always `scheduler rate × sparsity factor`, so
    /// schedules and sparsity scaling compose without special cases.
    pub fn set_scheduler(&mut self, scheduler: Box<dyn LRScheduler + Send>) {
        self.base_lr = scheduler.get_lr();
        self.scheduler = Some(scheduler);
    }

    /// Add a training callback.
    pub fn add_callback<C: TrainerCallback + 'static>(&mut self, callback: C) {
        self.trainer.add_callback(callback);
    }

    /// The wrapped model.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The configuration.
    pub fn config(&self) -> &SniperConfig {
        &self.config
    }

    /// The artifact store.
    pub fn store(&self) -> &SniperStore {
        &self.store
    }

    /// The underlying trainer.
    pub fn trainer(&self) -> &Trainer {
        &self.trainer
    }

    /// Currently scheduled sparsity level.
    pub fn current_sparsity(&self) -> f32 {
        self.current_sparsity
    }

    /// Masks currently in force, if any.
    pub fn masks(&self) -> Option<&MaskSet> {
        self.masks.as_ref()
    }

    /// Count the sparsity the model actually exhibits right now.
    pub fn sparsity_report(&self) -> SparsityReport {
        SparsityReport::from_model(&self.model)
    }

    /// Validate the configuration and materialize every artifact the run
    /// needs: the init snapshot, importance scores, one mask set per
    /// scheduled sparsity level, and the starting masks.
    ///
    /// Artifacts already present in the store are reused, so a re-run with
    /// the same directory skips the expensive calibration pass.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration, on I/O problems in the store, or when
    /// masks must be built but no calibration batches are supplied.
    pub fn prepare<F>(&mut self, calibration: &[Batch], forward_fn: F) -> Result<()>
    where
        F: Fn(&Tensor) -> Tensor,
    {
        self.config.validate().map_err(Error::InvalidConfig)?;
        self.store.ensure()?;

        // Initial values: reuse a stored snapshot so re-runs start from the
        // same initialization the masks were computed for.
        if self.store.has_init() {
            let snapshot = self.store.load_init()?;
            if self.epoch == 0 {
                snapshot.apply_to(&self.model);
            }
        } else {
            let snapshot = InitSnapshot::capture(&self.model);
            self.store.save_init(&snapshot)?;
        }

        let max_param_sparsity = self.config.max_param_sparsity();
        let missing: Vec<f32> = self
            .config
            .schedule()
            .levels()
            .into_iter()
            .filter(|&level| !self.store.has_masks(level, max_param_sparsity))
            .collect();

        if !missing.is_empty() {
            let scores = if self.store.has_importance() {
                self.store.load_importance()?
            } else {
                if calibration.is_empty() {
                    return Err(Error::InvalidConfig(
                        "calibration batches required to compute importance scores".to_string(),
                    ));
                }
                let scores = self.compute_importance(calibration, &forward_fn)?;
                self.store.save_importance(&scores)?;
                scores
            };

            for level in missing {
                let masks = MaskSet::from_importance(&scores, level, max_param_sparsity);
                self.store.save_masks(&masks, level, max_param_sparsity)?;
            }
        }

        self.enter_sparsity_level(self.config.schedule().sparsity_at_epoch(self.epoch))?;
        if self.config.forward_mask() {
            if let Some(masks) = &self.masks {
                masks.apply(&self.model);
            }
        }
        self.refresh_lr();

        Ok(())
    }

    /// Run the epoch loop.
    ///
    /// Each epoch applies any scheduled sparsity transition, then trains on
    /// the batches from `batch_fn`. Masks are re-applied after every
    /// optimizer step while `forward_mask` is enabled.
    pub fn run<F, B, I>(&mut self, max_epochs: usize, batch_fn: B, forward_fn: F) -> Result<TrainResult>
    where
        F: Fn(&Tensor) -> Tensor,
        B: Fn() -> I,
        I: IntoIterator<Item = Batch>,
    {
        self.trainer.start_time = Some(Instant::now());
        self.trainer.best_loss = None;
        let mut stopped_early = false;
        let mut final_loss = 0.0;

        let ctx = self.trainer.build_context(self.epoch, max_epochs, 0, 0, 0.0, None);
        if self.trainer.callbacks.on_train_begin(&ctx) == CallbackAction::Stop {
            return Ok(TrainResult {
                final_epoch: self.epoch,
                final_loss: 0.0,
                best_loss: 0.0,
                stopped_early: true,
                elapsed_secs: 0.0,
            });
        }

        let start_epoch = self.epoch;
        for epoch in start_epoch..max_epochs {
            self.epoch = epoch;
            if epoch > start_epoch {
                self.apply_transition(epoch)?;
            }
            self.refresh_lr();

            let ctx = self.trainer.build_context(epoch, max_epochs, 0, 0, final_loss, None);
            match self.trainer.callbacks.on_epoch_begin(&ctx) {
                CallbackAction::Stop => {
                    stopped_early = true;
                    break;
                }
                CallbackAction::SkipEpoch => continue,
                CallbackAction::Continue => {}
            }

            let batches: Vec<Batch> = batch_fn().into_iter().collect();
            let steps_per_epoch = batches.len();
            let mut total_loss = 0.0;
            let mut num_batches = 0;

            for (step, batch) in batches.into_iter().enumerate() {
                let ctx = self
                    .trainer
                    .build_context(epoch, max_epochs, step, steps_per_epoch, final_loss, None);
                if self.trainer.callbacks.on_step_begin(&ctx) == CallbackAction::Stop {
                    stopped_early = true;
                    break;
                }

                let loss = self.sniper_step(&batch, &forward_fn);
                total_loss += loss;
                num_batches += 1;

                let ctx = self
                    .trainer
                    .build_context(epoch, max_epochs, step, steps_per_epoch, loss, None);
                if self.trainer.callbacks.on_step_end(&ctx) == CallbackAction::Stop {
                    stopped_early = true;
                    break;
                }
            }

            if stopped_early {
                break;
            }

            let avg_loss = if num_batches > 0 {
                total_loss / num_batches as f32
            } else {
                0.0
            };
            final_loss = avg_loss;

            if self.trainer.best_loss.is_none_or(|best| avg_loss < best) {
                self.trainer.best_loss = Some(avg_loss);
            }
            self.trainer.metrics.record_epoch(avg_loss, self.trainer.lr());

            let ctx = self.trainer.build_context(
                epoch,
                max_epochs,
                steps_per_epoch,
                steps_per_epoch,
                avg_loss,
                None,
            );
            if self.trainer.callbacks.on_epoch_end(&ctx) == CallbackAction::Stop {
                stopped_early = true;
                break;
            }

            if let Some(scheduler) = &mut self.scheduler {
                scheduler.step();
                self.refresh_lr();
            }
        }

        if !stopped_early {
            self.epoch = max_epochs;
        }

        let ctx = self
            .trainer
            .build_context(self.trainer.metrics.epoch, max_epochs, 0, 0, final_loss, None);
        self.trainer.callbacks.on_train_end(&ctx);

        Ok(TrainResult {
            final_epoch: self.trainer.metrics.epoch,
            final_loss,
            best_loss: self.trainer.best_loss.unwrap_or(final_loss),
            stopped_early,
            elapsed_secs: self
                .trainer
                .start_time
                .map_or(0.0, |t| t.elapsed().as_secs_f64()),
        })
    }

    /// Resume at a later epoch: restores the masks the schedule dictates
    /// there. Learning rates are left to the optimizer state the caller
    /// restored from its own checkpoint.
    pub fn resume_from(&mut self, epoch: usize) -> Result<()> {
        self.epoch = epoch;
        self.enter_sparsity_level(self.config.schedule().sparsity_at_epoch(epoch))?;
        if self.config.forward_mask() {
            if let Some(masks) = &self.masks {
                masks.apply(&self.model);
            }
        }
        Ok(())
    }

    /// One training step with sparsity enforcement.
    fn sniper_step<F>(&mut self, batch: &Batch, forward_fn: F) -> f32
    where
        F: FnOnce(&Tensor) -> Tensor,
    {
        self.trainer.optimizer.zero_grad(&mut self.trainer.params);
        let loss = self.trainer.accumulate_gradients(batch, forward_fn);

        if self.config.lr_scaling() == LrScaling::PerParam && self.masks.is_some() {
            self.scale_grads_per_param();
        }
        if self.config.mask_gradients() {
            if let Some(masks) = &self.masks {
                masks.mask_grads(&self.model);
            }
        }
        if let Some(max_norm) = self.trainer.config.max_grad_norm {
            clip_grad_norm(&mut self.trainer.params, max_norm);
        }

        self.trainer.optimizer.step(&mut self.trainer.params);
        self.trainer.metrics.increment_step();

        // Optimizer updates revive pruned weights; pin them back to zero
        if self.config.forward_mask() {
            if let Some(masks) = &self.masks {
                masks.apply(&self.model);
            }
        }

        loss
    }

    /// Apply the schedule's transition for this epoch, if any.
    fn apply_transition(&mut self, epoch: usize) -> Result<()> {
        if !self.config.schedule().is_transition_epoch(epoch) {
            return Ok(());
        }

        self.enter_sparsity_level(self.config.schedule().sparsity_at_epoch(epoch))?;

        if self.config.restore_init_values() {
            let snapshot = self.store.load_init()?;
            snapshot.restore_newly_active(&self.model, self.masks.as_ref());
        }
        if self.config.forward_mask() {
            if let Some(masks) = &self.masks {
                masks.apply(&self.model);
            }
        }
        Ok(())
    }

    /// Load masks and LR factors for a sparsity level (0 clears both).
    fn enter_sparsity_level(&mut self, sparsity: f32) -> Result<()> {
        self.current_sparsity = sparsity;
        self.trainer.set_reported_sparsity(sparsity);

        if sparsity > 0.0 {
            let mut masks = self
                .store
                .load_masks(sparsity, self.config.max_param_sparsity())?;
            masks.retain_eligible(self.config.exclude_params());

            match self.config.lr_scaling() {
                LrScaling::Off => {}
                LrScaling::Global => {
                    self.lr_state.update_global(sparsity, self.config.max_lr_scaling());
                }
                LrScaling::PerParam => {
                    self.lr_state.update_per_param(&masks, self.config.max_lr_scaling());
                }
            }
            self.masks = Some(masks);
        } else {
            self.masks = None;
            self.lr_state.reset();
        }
        Ok(())
    }

    /// Recompute the optimizer LR from the scheduler base and sparsity factor.
    fn refresh_lr(&mut self) {
        let base = self
            .scheduler
            .as_ref()
            .map_or(self.base_lr, |s| s.get_lr());
        let factor = match self.config.lr_scaling() {
            LrScaling::Global => self.lr_state.global_factor(),
            LrScaling::Off | LrScaling::PerParam => 1.0,
        };
        self.trainer.set_lr(base * factor);
    }

    /// Scale each parameter's gradient by its density factor.
    fn scale_grads_per_param(&mut self) {
        for (name, param) in &self.model.parameters {
            let factor = self.lr_state.param_factor(name);
            if factor != 1.0 {
                if let Some(grad) = param.grad() {
                    param.set_grad(grad * factor);
                }
            }
        }
    }

    /// Accumulate connection sensitivities over the calibration batches.
    fn compute_importance<F>(&mut self, batches: &[Batch], forward_fn: &F) -> Result<ImportanceScores>
    where
        F: Fn(&Tensor) -> Tensor,
    {
        let mut collector = SnipCollector::new(self.config.exclude_params());

        for batch in batches {
            self.trainer.optimizer.zero_grad(&mut self.trainer.params);
            let _ = self.trainer.accumulate_gradients(batch, forward_fn);
            collector.accumulate(&self.model)?;
        }
        self.trainer.optimizer.zero_grad(&mut self.trainer.params);

        Ok(collector.finalize())
    }
}
