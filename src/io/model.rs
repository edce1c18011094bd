//! Model structure for serialization

use crate::{Error, Result, Tensor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Model metadata containing architecture and training information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Model name/identifier
    pub name: String,

    /// Model architecture type (e.g., "linear", "custom")
    pub architecture: String,

    /// Model version
    pub version: String,

    /// Custom metadata fields
    #[serde(default)]
    pub custom: HashMap<String, serde_json::Value>,
}

impl ModelMetadata {
    /// Create new metadata with minimal fields
    pub fn new(name: impl Into<String>, architecture: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            architecture: architecture.into(),
            version: "0.1.0".to_string(),
            custom: HashMap::new(),
        }
    }

    /// Add custom metadata field
    pub fn with_custom(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.custom.insert(key.into(), value);
        self
    }
}

/// Information about a model parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterInfo {
    /// Parameter name (e.g., "layer1.weight", "bias")
    pub name: String,

    /// Number of elements
    pub len: usize,

    /// Whether this parameter requires gradients
    pub requires_grad: bool,
}

/// Serializable model state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelState {
    /// Model metadata
    pub metadata: ModelMetadata,

    /// Parameter information
    pub parameters: Vec<ParameterInfo>,

    /// Flattened parameter data
    pub data: Vec<f32>,
}

/// High-level model abstraction: named parameters plus metadata
pub struct Model {
    /// Model metadata
    pub metadata: ModelMetadata,

    /// Model parameters
    pub parameters: Vec<(String, Tensor)>,
}

impl Model {
    /// Create a new model
    pub fn new(metadata: ModelMetadata, parameters: Vec<(String, Tensor)>) -> Self {
        Self {
            metadata,
            parameters,
        }
    }

    /// Get parameter by name
    pub fn get_parameter(&self, name: &str) -> Option<&Tensor> {
        self.parameters
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t)
    }

    /// Iterate over named parameters
    pub fn named_parameters(&self) -> impl Iterator<Item = (&str, &Tensor)> {
        self.parameters.iter().map(|(n, t)| (n.as_str(), t))
    }

    /// Total number of weight elements
    pub fn num_elements(&self) -> usize {
        self.parameters.iter().map(|(_, t)| t.len()).sum()
    }

    /// Convert model to serializable state
    pub fn to_state(&self) -> ModelState {
        let mut data = Vec::new();
        let parameters: Vec<ParameterInfo> = self
            .parameters
            .iter()
            .map(|(name, tensor)| {
                data.extend(tensor.to_vec());
                ParameterInfo {
                    name: name.clone(),
                    len: tensor.len(),
                    requires_grad: tensor.requires_grad(),
                }
            })
            .collect();

        ModelState {
            metadata: self.metadata.clone(),
            parameters,
            data,
        }
    }

    /// Rebuild a model from serialized state
    pub fn from_state(state: ModelState) -> Result<Self> {
        let total: usize = state.parameters.iter().map(|p| p.len).sum();
        if total != state.data.len() {
            return Err(Error::ShapeMismatch {
                name: state.metadata.name.clone(),
                expected: total,
                actual: state.data.len(),
            });
        }

        let mut parameters = Vec::with_capacity(state.parameters.len());
        let mut offset = 0;
        for info in &state.parameters {
            let slice = state.data[offset..offset + info.len].to_vec();
            parameters.push((
                info.name.clone(),
                Tensor::from_vec(slice, info.requires_grad),
            ));
            offset += info.len;
        }

        Ok(Self {
            metadata: state.metadata,
            parameters,
        })
    }
}
