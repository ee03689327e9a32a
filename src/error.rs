//! Error types for dataset preparation

use thiserror::Error;

/// Errors that can occur while preparing a temporal graph dataset
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("invalid split ratios: val_ratio={val_ratio}, test_ratio={test_ratio} (each must lie in (0, 1) and sum to less than 1)")]
    InvalidRatios { val_ratio: f64, test_ratio: f64 },

    #[error("new-node sample of {requested} nodes exceeds the {population} nodes seen after the validation cutoff")]
    SampleTooLarge { requested: usize, population: usize },

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("interaction table is empty")]
    EmptyTable,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for dataset operations
pub type Result<T> = std::result::Result<T, DatasetError>;
