//! Achieved-sparsity reporting

use crate::io::Model;
use serde::Serialize;

/// Nonzero statistics for one parameter.
#[derive(Debug, Clone, Serialize)]
pub struct ParamSparsity {
    /// Parameter name
    pub name: String,
    /// Weights that are currently nonzero
    pub nonzeros: usize,
    /// Total weights
    pub total: usize,
    /// Fraction of zero weights
    pub sparsity: f32,
}

/// Snapshot of the sparsity a model actually exhibits.
#[derive(Debug, Clone, Serialize)]
pub struct SparsityReport {
    /// Per-parameter breakdown
    pub params: Vec<ParamSparsity>,
    /// Nonzero weights across the model
    pub nonzeros: usize,
    /// Total weights across the model
    pub total: usize,
    /// Overall fraction of zero weights
    pub sparsity: f32,
}

impl SparsityReport {
    /// Count zero weights across all parameters of `model`.
    pub fn from_model(model: &Model) -> Self {
        let mut params = Vec::with_capacity(model.parameters.len());
        let mut nonzeros = 0;
        let mut total = 0;

        for (name, tensor) in model.named_parameters() {
            let data = tensor.data();
            let param_nonzeros = data.iter().filter(|&&v| v != 0.0).count();
            let param_total = data.len();

            nonzeros += param_nonzeros;
            total += param_total;

            params.push(ParamSparsity {
                name: name.to_string(),
                nonzeros: param_nonzeros,
                total: param_total,
                sparsity: fraction_zero(param_nonzeros, param_total),
            });
        }

        Self {
            params,
            nonzeros,
            total,
            sparsity: fraction_zero(nonzeros, total),
        }
    }
}

fn fraction_zero(nonzeros: usize, total: usize) -> f32 {
    if total == 0 {
        0.0
    } else {
        1.0 - nonzeros as f32 / total as f32
    }
}
