//! Distance Threshold
//!
//! Hard cutoff on reconstruction distance. Strictly greater than the
//! threshold is an anomaly; a distance exactly at the threshold is normal.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_DISTANCE_THRESHOLD;
use crate::logic::error::{ReplicatorError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceThreshold {
    value: f64,
}

impl Default for DistanceThreshold {
    fn default() -> Self {
        Self { value: DEFAULT_DISTANCE_THRESHOLD }
    }
}

impl DistanceThreshold {
    pub fn new(value: f64) -> Result<Self> {
        if !(value.is_finite() && value >= 0.0) {
            return Err(ReplicatorError::invalid_config(format!(
                "distance threshold must be finite and >= 0, got {}",
                value
            )));
        }
        Ok(Self { value })
    }

    /// Get current threshold
    pub fn get(&self) -> f64 {
        self.value
    }

    /// Check if distance exceeds threshold
    pub fn is_anomaly(&self, distance: f64) -> bool {
        distance > self.value
    }

    /// 1.0 above the threshold, 0.0 otherwise
    pub fn anomaly_score(&self, distance: f64) -> f64 {
        if self.is_anomaly(distance) {
            1.0
        } else {
            0.0
        }
    }
}
