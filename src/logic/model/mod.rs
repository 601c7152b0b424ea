//! Model Module - Replicator network, training and scoring
//!
//! # Architecture
//! - `network.rs`: `Topology`, `ReplicatorNetwork` (one sigmoid hidden layer)
//! - `trainer.rs`: Backpropagation loop with early stop on `max_error`
//! - `trained.rs`: Immutable `TrainedModel` snapshot
//! - `threshold.rs`: Hard distance cutoff
//! - `scorer.rs`: Reconstruction distance -> `AnomalyScore`
//! - `storage.rs`: JSON persistence with checksum validation

pub mod network;
pub mod trainer;
pub mod trained;
pub mod threshold;
pub mod scorer;
pub mod storage;
#[cfg(test)]
mod tests;

// Re-export common types
pub use network::{ReplicatorNetwork, Topology};
pub use trainer::{StopReason, Trainer, TrainingParams, TrainingReport};
pub use trained::{ModelMetadata, Reconstruction, TrainedModel};
pub use threshold::DistanceThreshold;
pub use scorer::{euclidean_distance, score, AnomalyScore};
pub use storage::{default_model_path, load_model, output_model_path, save_model};
