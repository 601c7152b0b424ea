//! Logic Module - Replicator Engine
//!
//! ## Architecture
//! - `dataset/` - Tabular input, capability checks, CSV adapter
//! - `features/` - Min-max normalization fitted at training time
//! - `model/` - Replicator network, trainer, scorer, persistence
//! - `classifier.rs` - Train/score entry points holding the current model
//! - `config.rs` - Tunables and option strings
//! - `events.rs` - Training progress observers

pub mod config;
pub mod error;
pub mod events;

pub mod dataset;
pub mod features;
pub mod model;

pub mod classifier;

pub use classifier::{fit, ClassifierState, ReplicatorClassifier};
pub use config::{global_info, OptionInfo, ReplicatorConfig};
pub use error::{ReplicatorError, Result};
