//! Replicator Neural Network
//!
//! Anomaly detection by reconstruction: a one-hidden-layer network learns to
//! reproduce its normalized input, and instances it reconstructs poorly
//! (Euclidean distance above a threshold) are flagged as anomalies.

pub mod constants;
pub mod logic;

pub use logic::classifier::{fit, ClassifierState, ReplicatorClassifier};
pub use logic::config::ReplicatorConfig;
pub use logic::dataset::{Dataset, Header, Instance};
pub use logic::error::{ReplicatorError, Result};
pub use logic::model::{AnomalyScore, TrainedModel};
