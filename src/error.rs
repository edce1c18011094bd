//! Crate-level error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by podar operations
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No masks stored for sparsity {sparsity} at {}", path.display())]
    MaskNotFound { sparsity: f32, path: PathBuf },

    #[error("Shape mismatch for '{name}': expected {expected}, got {actual}")]
    ShapeMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// Result type for podar operations
pub type Result<T> = std::result::Result<T, Error>;
