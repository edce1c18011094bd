//! Connection-sensitivity importance scoring
//!
//! Scores each weight by how much the loss reacts to switching it off:
//! the gradient of the loss with respect to a multiplicative keep-mask,
//! which at mask 1 is `∂L/∂w ⊙ w`. Sensitivities are summed over the
//! calibration batches and the magnitude of the sum is the importance.

use crate::io::Model;
use crate::{Error, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Whether a parameter name is excluded from pruning.
///
/// A parameter is excluded when its name contains any of the exclusion
/// substrings (e.g. "embed" matches "encoder.embed.weight").
pub(crate) fn is_excluded(name: &str, exclude_params: &[String]) -> bool {
    exclude_params.iter().any(|e| name.contains(e.as_str()))
}

/// Per-parameter importance magnitudes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportanceScores {
    scores: BTreeMap<String, Vec<f32>>,
}

impl ImportanceScores {
    /// Build from named score vectors.
    pub fn new(scores: BTreeMap<String, Vec<f32>>) -> Self {
        Self { scores }
    }

    /// Scores for one parameter.
    pub fn get(&self, name: &str) -> Option<&[f32]> {
        self.scores.get(name).map(Vec::as_slice)
    }

    /// Iterate over named score vectors.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f32])> {
        self.scores.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    /// Number of scored parameters.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Whether no parameters are scored.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Total number of scored weights.
    pub fn total_elements(&self) -> usize {
        self.scores.values().map(Vec::len).sum()
    }
}

/// Accumulates connection sensitivities over calibration batches.
///
/// Drive it with the training machinery: run a forward/backward pass per
/// batch, then call [`SnipCollector::accumulate`] to fold the parameter
/// gradients in. [`SnipCollector::finalize`] produces the importance
/// magnitudes.
#[derive(Debug, Clone)]
pub struct SnipCollector {
    exclude_params: Vec<String>,
    totals: BTreeMap<String, Array1<f32>>,
    batches_seen: usize,
}

impl SnipCollector {
    /// Create a collector; parameters matching `exclude_params` are skipped.
    pub fn new(exclude_params: &[String]) -> Self {
        Self {
            exclude_params: exclude_params.to_vec(),
            totals: BTreeMap::new(),
            batches_seen: 0,
        }
    }

    /// Whether a parameter participates in scoring.
    pub fn is_eligible(&self, name: &str, requires_grad: bool) -> bool {
        requires_grad && !is_excluded(name, &self.exclude_params)
    }

    /// Fold the current parameter gradients of `model` into the running sums.
    ///
    /// Call after a backward pass. Parameters without a gradient are skipped.
    ///
    /// # Errors
    ///
    /// Returns `Error::ShapeMismatch` if a parameter changed length between
    /// batches.
    pub fn accumulate(&mut self, model: &Model) -> Result<()> {
        for (name, param) in model.named_parameters() {
            if !self.is_eligible(name, param.requires_grad()) {
                continue;
            }
            let Some(grad) = param.grad() else { continue };

            // ∂L/∂mask = ∂L/∂w ⊙ w
            let sensitivity = grad * param.data();

            match self.totals.entry(name.to_string()) {
                Entry::Occupied(mut entry) => {
                    let total = entry.get_mut();
                    if total.len() != sensitivity.len() {
                        return Err(Error::ShapeMismatch {
                            name: name.to_string(),
                            expected: total.len(),
                            actual: sensitivity.len(),
                        });
                    }
                    *total = &*total + &sensitivity;
                }
                Entry::Vacant(entry) => {
                    entry.insert(sensitivity);
                }
            }
        }

        self.batches_seen += 1;
        Ok(())
    }

    /// Number of batches folded in so far.
    pub fn batches_seen(&self) -> usize {
        self.batches_seen
    }

    /// Take the magnitude of the accumulated sensitivities.
    pub fn finalize(self) -> ImportanceScores {
        let scores = self
            .totals
            .into_iter()
            .map(|(name, total)| (name, total.mapv(f32::abs).to_vec()))
            .collect();
        ImportanceScores::new(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{Model, ModelMetadata};
    use crate::Tensor;
    use ndarray::arr1;

    fn model_with_grads() -> Model {
        let weight = Tensor::from_vec(vec![2.0, -3.0], true);
        weight.set_grad(arr1(&[1.0, 1.0]));
        let embed = Tensor::from_vec(vec![5.0], true);
        embed.set_grad(arr1(&[5.0]));
        let frozen = Tensor::from_vec(vec![7.0], false);

        Model::new(
            ModelMetadata::new("m", "linear"),
            vec![
                ("weight".to_string(), weight),
                ("embed.weight".to_string(), embed),
                ("frozen".to_string(), frozen),
            ],
        )
    }

    #[test]
    fn test_excluded_name_matching() {
        let exclude = vec!["embed".to_string(), "norm".to_string()];
        assert!(is_excluded("encoder.embed.weight", &exclude));
        assert!(is_excluded("layer_norm.bias", &exclude));
        assert!(!is_excluded("encoder.linear.weight", &exclude));
    }

    #[test]
    fn test_collector_skips_excluded_and_frozen() {
        let model = model_with_grads();
        let mut collector = SnipCollector::new(&["embed".to_string()]);
        collector.accumulate(&model).unwrap();

        let scores = collector.finalize();
        assert_eq!(scores.len(), 1);
        assert!(scores.get("weight").is_some());
        assert!(scores.get("embed.weight").is_none());
        assert!(scores.get("frozen").is_none());
    }

    #[test]
    fn test_sensitivity_is_grad_times_weight() {
        let model = model_with_grads();
        let mut collector = SnipCollector::new(&[]);
        collector.accumulate(&model).unwrap();

        let scores = collector.finalize();
        // |1.0 * 2.0| = 2.0, |1.0 * -3.0| = 3.0
        assert_eq!(scores.get("weight").unwrap(), &[2.0, 3.0]);
    }

    #[test]
    fn test_accumulation_sums_before_abs() {
        let weight = Tensor::from_vec(vec![1.0], true);
        let model = Model::new(
            ModelMetadata::new("m", "linear"),
            vec![("w".to_string(), weight.clone())],
        );

        let mut collector = SnipCollector::new(&[]);
        weight.set_grad(arr1(&[3.0]));
        collector.accumulate(&model).unwrap();
        weight.zero_grad();
        weight.set_grad(arr1(&[-2.0]));
        collector.accumulate(&model).unwrap();

        let scores = collector.finalize();
        // |3.0 + (-2.0)| = 1.0, not |3.0| + |-2.0|
        assert_eq!(scores.get("w").unwrap(), &[1.0]);
    }

    #[test]
    fn test_batches_seen() {
        let model = model_with_grads();
        let mut collector = SnipCollector::new(&[]);
        collector.accumulate(&model).unwrap();
        collector.accumulate(&model).unwrap();
        assert_eq!(collector.batches_seen(), 2);
    }

    #[test]
    fn test_scores_serde_roundtrip() {
        let scores = ImportanceScores::new(BTreeMap::from([(
            "w".to_string(),
            vec![0.5, 1.5],
        )]));
        let json = serde_json::to_string(&scores).unwrap();
        let back: ImportanceScores = serde_json::from_str(&json).unwrap();
        assert_eq!(scores, back);
        assert_eq!(back.total_elements(), 2);
    }
}
