//! On-disk artifact store
//!
//! Caches the expensive artifacts of a progressive-sparsity run under one
//! directory so repeated runs skip recomputation:
//!
//! ```text
//! <dir>/init_values.json          initial parameter snapshot
//! <dir>/importance.json           accumulated importance scores
//! <dir>/masks_<pct>[_max<pct>].json   one mask set per sparsity level
//! ```

use crate::sniper::importance::ImportanceScores;
use crate::sniper::mask::MaskSet;
use crate::sniper::snapshot::InitSnapshot;
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Store rooted at a sniper run directory.
#[derive(Debug, Clone)]
pub struct SniperStore {
    dir: PathBuf,
}

impl SniperStore {
    /// Create a store rooted at `dir` (not created until [`SniperStore::ensure`]).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The store directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the store directory if it does not exist.
    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Path of the initial-values snapshot.
    pub fn init_path(&self) -> PathBuf {
        self.dir.join("init_values.json")
    }

    /// Path of the importance-score cache.
    pub fn importance_path(&self) -> PathBuf {
        self.dir.join("importance.json")
    }

    /// Path of the mask file for a sparsity level.
    pub fn masks_path(&self, sparsity: f32, max_param_sparsity: f32) -> PathBuf {
        let max_suffix = if max_param_sparsity < 1.0 {
            format!("_max{}", format_sparsity(max_param_sparsity))
        } else {
            String::new()
        };
        self.dir
            .join(format!("masks_{}{}.json", format_sparsity(sparsity), max_suffix))
    }

    /// Whether a mask file exists for this level.
    pub fn has_masks(&self, sparsity: f32, max_param_sparsity: f32) -> bool {
        self.masks_path(sparsity, max_param_sparsity).exists()
    }

    /// Whether the initial snapshot is stored.
    pub fn has_init(&self) -> bool {
        self.init_path().exists()
    }

    /// Whether importance scores are stored.
    pub fn has_importance(&self) -> bool {
        self.importance_path().exists()
    }

    /// Persist a mask set for a sparsity level.
    pub fn save_masks(
        &self,
        masks: &MaskSet,
        sparsity: f32,
        max_param_sparsity: f32,
    ) -> Result<()> {
        write_json(&self.masks_path(sparsity, max_param_sparsity), masks)
    }

    /// Load the mask set for a sparsity level.
    ///
    /// # Errors
    ///
    /// `Error::MaskNotFound` if no mask file exists for the level.
    pub fn load_masks(&self, sparsity: f32, max_param_sparsity: f32) -> Result<MaskSet> {
        let path = self.masks_path(sparsity, max_param_sparsity);
        if !path.exists() {
            return Err(Error::MaskNotFound { sparsity, path });
        }
        read_json(&path)
    }

    /// Persist importance scores.
    pub fn save_importance(&self, scores: &ImportanceScores) -> Result<()> {
        write_json(&self.importance_path(), scores)
    }

    /// Load cached importance scores.
    pub fn load_importance(&self) -> Result<ImportanceScores> {
        read_json(&self.importance_path())
    }

    /// Persist the initial parameter snapshot.
    pub fn save_init(&self, snapshot: &InitSnapshot) -> Result<()> {
        write_json(&self.init_path(), snapshot)
    }

    /// Load the initial parameter snapshot.
    pub fn load_init(&self) -> Result<InitSnapshot> {
        read_json(&self.init_path())
    }

    /// All stored mask files, sorted by file name.
    pub fn list_mask_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        if !self.dir.exists() {
            return Ok(files);
        }
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.starts_with("masks_") && name.ends_with(".json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let data = serde_json::to_string(value)
        .map_err(|e| Error::Serialization(format!("JSON serialization failed: {e}")))?;
    fs::write(path, data)?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| Error::Serialization(format!("JSON deserialization failed: {e}")))
}

/// Format a sparsity fraction as a percentage with trailing zeros trimmed,
/// e.g. `0.9` → `"90"`, `0.925` → `"92.5"`.
pub(crate) fn format_sparsity(sparsity: f32) -> String {
    let mut s = format!("{:.4}", sparsity * 100.0);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}
