//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! `ReplicatorConfig::default()` and the env loader both read from here.

/// Default hidden layer offset (hidden width = inputs - offset)
pub const DEFAULT_HIDDEN_LAYER_OFFSET: i32 = -1;

/// Default training epoch cap
pub const DEFAULT_MAX_EPOCHS: usize = 1000;

/// Default anomaly cutoff on reconstruction distance
pub const DEFAULT_DISTANCE_THRESHOLD: f64 = 0.1;

/// Default early-stop training error
pub const DEFAULT_MAX_ERROR: f64 = 0.001;

/// Default backpropagation learning rate
pub const DEFAULT_LEARNING_RATE: f64 = 0.2;

/// Default backpropagation momentum
pub const DEFAULT_MOMENTUM: f64 = 0.7;

/// Default weight initialization seed
pub const DEFAULT_SEED: u64 = 1;

/// Minimum number of instances required before training
pub const MIN_INSTANCES: usize = 100;

/// Epochs between progress events
pub const DEFAULT_PROGRESS_INTERVAL: usize = 100;

/// Half-width of the uniform weight initialization range
pub const WEIGHT_INIT_RANGE: f64 = 0.5;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Replicator";

// ============================================
// Environment variable names
// ============================================

pub const ENV_HIDDEN_LAYER_OFFSET: &str = "REPLICATOR_HIDDEN_OFFSET";
pub const ENV_MAX_EPOCHS: &str = "REPLICATOR_MAX_EPOCHS";
pub const ENV_DISTANCE_THRESHOLD: &str = "REPLICATOR_DISTANCE_THRESHOLD";
pub const ENV_MAX_ERROR: &str = "REPLICATOR_MAX_ERROR";
pub const ENV_LEARNING_RATE: &str = "REPLICATOR_LEARNING_RATE";
pub const ENV_MOMENTUM: &str = "REPLICATOR_MOMENTUM";
pub const ENV_SEED: &str = "REPLICATOR_SEED";
pub const ENV_MIN_INSTANCES: &str = "REPLICATOR_MIN_INSTANCES";
pub const ENV_MODEL_PATH: &str = "REPLICATOR_MODEL_PATH";
pub const ENV_SAVE_MODEL: &str = "REPLICATOR_SAVE_MODEL";
