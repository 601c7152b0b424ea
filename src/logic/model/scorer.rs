//! Anomaly Scorer
//!
//! Reconstruction distance -> hard anomaly score. Pure function of
//! (instance, trained model); safe to call concurrently.

use serde::{Deserialize, Serialize};

use crate::logic::error::{ReplicatorError, Result};
use super::threshold::DistanceThreshold;
use super::trained::TrainedModel;

/// Score for one instance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyScore {
    /// Euclidean distance between normalized input and reconstruction
    pub distance: f64,
    /// 1.0 - |anomaly|
    pub normalcy: f64,
    /// 0.0 or 1.0
    pub anomaly: f64,
}

impl AnomalyScore {
    pub fn from_distance(distance: f64, threshold: DistanceThreshold) -> Self {
        let anomaly = threshold.anomaly_score(distance);
        Self {
            distance,
            normalcy: 1.0 - anomaly.abs(),
            anomaly,
        }
    }

    pub fn is_anomaly(&self) -> bool {
        self.anomaly > 0.0
    }

    /// `[normalcy, anomaly]`
    pub fn distribution(&self) -> [f64; 2] {
        [self.normalcy, self.anomaly]
    }
}

/// Euclidean distance between two equal-length vectors
pub fn euclidean_distance(input: &[f64], output: &[f64]) -> Result<f64> {
    if input.len() != output.len() {
        return Err(ReplicatorError::DimensionMismatch {
            expected: input.len(),
            got: output.len(),
        });
    }

    let power_sum: f64 = output
        .iter()
        .zip(input.iter())
        .map(|(o, i)| (o - i).powi(2))
        .sum();

    Ok(power_sum.sqrt())
}

/// Score raw features against a trained model
pub fn score(model: &TrainedModel, features: &[f64], threshold: DistanceThreshold) -> Result<AnomalyScore> {
    let reconstruction = model.reconstruct(features)?;
    let distance = euclidean_distance(&reconstruction.input, &reconstruction.output)?;

    log::debug!(
        "Test instance: {:?} | euclidean distance: {}",
        features,
        distance
    );

    Ok(AnomalyScore::from_distance(distance, threshold))
}
