//! Classifier Configuration
//!
//! Immutable tunables passed into training and scoring.
//! Defaults live in `constants.rs`; `from_env()` overlays `REPLICATOR_*` variables.

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use super::error::{ReplicatorError, Result};

/// Replicator classifier configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicatorConfig {
    /// Hidden width = inputs - offset (negative offset widens the hidden layer)
    pub hidden_layer_offset: i32,

    /// Training epoch cap
    pub max_epochs: usize,

    /// Anomaly cutoff on reconstruction distance
    pub distance_threshold: f64,

    /// Early-stop training error
    pub max_error: f64,

    /// Backpropagation step size
    pub learning_rate: f64,

    /// Fraction of the previous weight change carried into the next one
    pub momentum: f64,

    /// Weight initialization seed
    pub seed: u64,

    /// Minimum dataset size accepted for training
    pub min_instances: usize,

    /// Epochs between progress events
    pub progress_interval: usize,
}

impl Default for ReplicatorConfig {
    fn default() -> Self {
        Self {
            hidden_layer_offset: DEFAULT_HIDDEN_LAYER_OFFSET,
            max_epochs: DEFAULT_MAX_EPOCHS,
            distance_threshold: DEFAULT_DISTANCE_THRESHOLD,
            max_error: DEFAULT_MAX_ERROR,
            learning_rate: DEFAULT_LEARNING_RATE,
            momentum: DEFAULT_MOMENTUM,
            seed: DEFAULT_SEED,
            min_instances: MIN_INSTANCES,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

/// Read an env var, falling back when unset or unparseable
fn env_or<T: FromStr>(key: &str, fallback: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(fallback)
}

impl ReplicatorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            hidden_layer_offset: env_or(ENV_HIDDEN_LAYER_OFFSET, defaults.hidden_layer_offset),
            max_epochs: env_or(ENV_MAX_EPOCHS, defaults.max_epochs),
            distance_threshold: env_or(ENV_DISTANCE_THRESHOLD, defaults.distance_threshold),
            max_error: env_or(ENV_MAX_ERROR, defaults.max_error),
            learning_rate: env_or(ENV_LEARNING_RATE, defaults.learning_rate),
            momentum: env_or(ENV_MOMENTUM, defaults.momentum),
            seed: env_or(ENV_SEED, defaults.seed),
            min_instances: env_or(ENV_MIN_INSTANCES, defaults.min_instances),
            progress_interval: defaults.progress_interval,
        }
    }

    /// Sanity-check the numeric tunables
    pub fn validate(&self) -> Result<()> {
        if self.max_epochs == 0 {
            return Err(ReplicatorError::invalid_config("max_epochs must be > 0"));
        }
        if !(self.distance_threshold.is_finite() && self.distance_threshold >= 0.0) {
            return Err(ReplicatorError::invalid_config(
                "distance_threshold must be finite and >= 0",
            ));
        }
        if !(self.max_error.is_finite() && self.max_error >= 0.0) {
            return Err(ReplicatorError::invalid_config("max_error must be finite and >= 0"));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ReplicatorError::invalid_config("learning_rate must be finite and > 0"));
        }
        if !(0.0..1.0).contains(&self.momentum) {
            return Err(ReplicatorError::invalid_config("momentum must be in [0, 1)"));
        }
        Ok(())
    }

    // ========================================================================
    // OPTION VECTOR (-H -I -D -E)
    // ========================================================================

    /// Current setup as a flag/value vector
    pub fn options(&self) -> Vec<String> {
        vec![
            "-H".to_string(),
            self.hidden_layer_offset.to_string(),
            "-I".to_string(),
            self.max_epochs.to_string(),
            "-D".to_string(),
            self.distance_threshold.to_string(),
            "-E".to_string(),
            self.max_error.to_string(),
        ]
    }

    /// Build a config from a flag/value vector; unset flags keep their defaults.
    /// Unknown flags, missing values and malformed numbers are rejected.
    pub fn from_options<S: AsRef<str>>(options: &[S]) -> Result<Self> {
        let mut config = Self::default();
        let mut iter = options.iter().map(|s| s.as_ref().trim()).filter(|s| !s.is_empty());

        while let Some(flag) = iter.next() {
            let value = iter
                .next()
                .ok_or_else(|| ReplicatorError::invalid_config(format!("no value given for {}", flag)))?;

            match flag {
                "-H" => config.hidden_layer_offset = parse_option(flag, value)?,
                "-I" => config.max_epochs = parse_option(flag, value)?,
                "-D" => config.distance_threshold = parse_option(flag, value)?,
                "-E" => config.max_error = parse_option(flag, value)?,
                other => {
                    return Err(ReplicatorError::invalid_config(format!(
                        "illegal option: {}",
                        other
                    )))
                }
            }
        }

        Ok(config)
    }

    /// Flag descriptions with the current values as defaults
    pub fn list_options(&self) -> Vec<OptionInfo> {
        vec![
            OptionInfo {
                flag: "-H",
                synopsis: "-H <difference number>",
                description: format!(
                    "The difference between the number of neurons in the input/output layers and the hidden layer (default {}).",
                    self.hidden_layer_offset
                ),
            },
            OptionInfo {
                flag: "-I",
                synopsis: "-I <the maximum number of epochs>",
                description: format!("The maximum number of epochs (default {}).", self.max_epochs),
            },
            OptionInfo {
                flag: "-D",
                synopsis: "-D <distance threshold>",
                description: format!(
                    "The threshold distance to classify an instance as anomaly (default {}).",
                    self.distance_threshold
                ),
            },
            OptionInfo {
                flag: "-E",
                synopsis: "-E <maximum error>",
                description: format!("The max error to stop training (default {}).", self.max_error),
            },
        ]
    }
}

fn parse_option<T: FromStr>(flag: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        ReplicatorError::invalid_config(format!("malformed value '{}' for {}", value, flag))
    })
}

/// Description of one supported option flag
#[derive(Debug, Clone, Serialize)]
pub struct OptionInfo {
    pub flag: &'static str,
    pub synopsis: &'static str,
    pub description: String,
}

/// Human-readable description of the classifier
pub fn global_info() -> &'static str {
    "Implements the Replicator Neural Network method for anomaly detection.\n\n\
     Note that this classifier is designed for anomaly detection, it is not designed for \
     solving two-class or multi-class classification problems!\n\n\
     The data is expected to have a class attribute with one or two values, which is \
     ignored at training time. Scoring returns (1 - anomaly score) as the first element \
     in the distribution and the anomaly score as the second.\n\n\
     To evaluate performance on a dataset where anomalies are known, code the anomalies \
     using the class attribute: normal cases should correspond to the first value of the \
     class attribute, anomalies to the second one."
}
