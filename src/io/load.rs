//! Model loading functionality

use super::format::ModelFormat;
use super::model::{Model, ModelState};
use crate::{Error, Result};
use std::fs;
use std::path::Path;

/// Load a model from a file
///
/// The format is inferred from the file extension (`.json`, `.yaml`/`.yml`)
/// unless one is given explicitly.
pub fn load_model(path: impl AsRef<Path>) -> Result<Model> {
    let path = path.as_ref();
    let format = infer_format(path)?;
    load_model_with_format(path, format)
}

/// Load a model from a file with an explicit format
pub fn load_model_with_format(path: impl AsRef<Path>, format: ModelFormat) -> Result<Model> {
    let content = fs::read_to_string(path.as_ref())?;

    let state: ModelState = match format {
        ModelFormat::Json => serde_json::from_str(&content)
            .map_err(|e| Error::Serialization(format!("JSON deserialization failed: {e}")))?,
        ModelFormat::Yaml => serde_yaml::from_str(&content)
            .map_err(|e| Error::Serialization(format!("YAML deserialization failed: {e}")))?,
    };

    Model::from_state(state)
}

fn infer_format(path: &Path) -> Result<ModelFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(ModelFormat::Json),
        Some("yaml") | Some("yml") => Ok(ModelFormat::Yaml),
        other => Err(Error::Serialization(format!(
            "Cannot infer model format from extension {other:?}"
        ))),
    }
}
