//! Progressive-sparsity training demo
//!
//! Walks the full workflow on a toy model:
//! - schedule definition and the sparsity curve
//! - importance scoring and mask precomputation
//! - the epoch loop with mask swaps and LR scaling
//!
//! Run with: cargo run --example sniper_demo

use podar::autograd::mul;
use podar::io::{Model, ModelMetadata};
use podar::optim::SGD;
use podar::sniper::{SniperConfig, SniperTrainer, SparsityMonitor, SparsitySchedule};
use podar::train::{Batch, MSELoss, TrainConfig};
use podar::Tensor;
use std::collections::BTreeMap;

fn main() -> podar::Result<()> {
    let schedule = SparsitySchedule::Stepwise {
        milestones: BTreeMap::from([(0, 0.75), (4, 0.5), (8, 0.25), (12, 0.0)]),
    };

    println!("Sparsity curve:");
    for epoch in 0..16 {
        let marker = if schedule.is_transition_epoch(epoch) {
            "  <- transition"
        } else {
            ""
        };
        println!(
            "  epoch {epoch:>2}: {:>5.1}%{marker}",
            schedule.sparsity_at_epoch(epoch) * 100.0
        );
    }

    // A toy "model": one weight vector, predictions = w ⊙ x
    let weight = Tensor::from_vec((1..=16).map(|i| i as f32 * 0.1).collect(), true);
    let model = Model::new(
        ModelMetadata::new("sniper-demo", "linear"),
        vec![("weight".to_string(), weight.clone())],
    );

    let dir = std::env::temp_dir().join("podar-sniper-demo");
    let config = SniperConfig::new(&dir)
        .with_schedule(schedule.clone())
        .with_exclude_params(vec![]);

    let mut trainer = SniperTrainer::new(
        model,
        Box::new(SGD::new(0.02, 0.9)),
        Box::new(MSELoss),
        TrainConfig::new().with_log_interval(1000),
        config,
    );
    trainer.add_callback(SparsityMonitor::new(schedule));

    let batches = vec![Batch::new(
        Tensor::from_vec(vec![1.0; 16], false),
        Tensor::from_vec(vec![3.0; 16], false),
    )];

    let w = weight.clone();
    trainer.prepare(&batches, move |x| mul(&w, x))?;

    let report = trainer.sparsity_report();
    println!(
        "\nAfter preparation: {}/{} weights active ({:.1}% sparse)",
        report.nonzeros,
        report.total,
        report.sparsity * 100.0
    );

    let w = weight.clone();
    let result = trainer.run(16, || batches.clone(), move |x| mul(&w, x))?;

    let report = trainer.sparsity_report();
    println!(
        "\nTrained {} epochs, final loss {:.4}, final sparsity {:.1}%",
        result.final_epoch,
        result.final_loss,
        report.sparsity * 100.0
    );

    Ok(())
}
