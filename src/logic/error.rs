//! Error handling

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReplicatorError>;

#[derive(Debug, Error)]
pub enum ReplicatorError {
    // Validation errors (raised before any training work starts)
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid topology: {inputs} inputs with hidden layer offset {offset} leaves no hidden units")]
    InvalidTopology { inputs: usize, offset: i32 },

    // Training errors
    #[error("training did not converge: network error became non-finite after {epochs} epochs")]
    TrainingDidNotConverge { epochs: usize },

    // Scoring errors
    #[error("no model built yet")]
    ModelNotBuilt,

    #[error("wrong class number: expected 2, got {got}")]
    InvalidLabelCardinality { got: usize },

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    // Persistence errors
    #[error("corrupt model: {0}")]
    CorruptModel(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl ReplicatorError {
    pub fn invalid_dataset(reason: impl Into<String>) -> Self {
        Self::InvalidDataset(reason.into())
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// Errors that indicate a defect in the calling layer rather than bad input
    pub fn is_fatal(&self) -> bool {
        matches!(self, ReplicatorError::DimensionMismatch { .. })
    }
}
