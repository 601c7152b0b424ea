//! Features Module - Feature Normalization
//!
//! Rescales raw feature columns into the network's working range.
//! The state is fitted once on training data and travels with the trained model.

pub mod normalizer;


// Re-export common types
pub use normalizer::{NormalizationState, LOWER_BOUND, UPPER_BOUND};
