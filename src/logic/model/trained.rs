//! Trained Model Snapshot
//!
//! Immutable bundle of everything scoring needs: the network, the fitted
//! normalization state and the input width. Replaced wholesale on retrain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::logic::error::{ReplicatorError, Result};
use crate::logic::features::NormalizationState;
use super::network::{ReplicatorNetwork, Topology};
use super::trainer::{StopReason, TrainingReport};

/// Model metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub id: Uuid,
    pub trained_at: DateTime<Utc>,
    pub epochs: usize,
    pub final_error: f64,
    pub stop_reason: StopReason,
}

impl ModelMetadata {
    pub fn from_report(report: &TrainingReport) -> Self {
        Self {
            id: Uuid::new_v4(),
            trained_at: Utc::now(),
            epochs: report.epochs,
            final_error: report.final_error,
            stop_reason: report.stop_reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    pub network: ReplicatorNetwork,
    pub normalization: NormalizationState,
    pub row_size: usize,
    pub metadata: ModelMetadata,
}

/// Normalized input and the network's reconstruction of it
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    pub input: Vec<f64>,
    pub output: Vec<f64>,
}

impl TrainedModel {
    pub fn new(
        network: ReplicatorNetwork,
        normalization: NormalizationState,
        report: &TrainingReport,
    ) -> Result<Self> {
        let model = Self {
            row_size: network.topology().inputs,
            network,
            normalization,
            metadata: ModelMetadata::from_report(report),
        };
        model.validate()?;
        Ok(model)
    }

    pub fn topology(&self) -> Topology {
        self.network.topology()
    }

    /// Internal consistency: widths agree and every weight is finite
    pub fn validate(&self) -> Result<()> {
        if !self.network.is_consistent() {
            return Err(ReplicatorError::CorruptModel(
                "weight shapes do not match topology".to_string(),
            ));
        }
        if self.topology().inputs != self.row_size || self.normalization.width() != self.row_size {
            return Err(ReplicatorError::CorruptModel(format!(
                "row size {} disagrees with topology {} or normalization width {}",
                self.row_size,
                self.topology(),
                self.normalization.width()
            )));
        }
        if self.normalization.max_vals.len() != self.row_size {
            return Err(ReplicatorError::CorruptModel("normalization bounds length mismatch".to_string()));
        }
        if !self.network.is_finite() {
            return Err(ReplicatorError::CorruptModel("non-finite weights".to_string()));
        }
        Ok(())
    }

    /// Normalize raw features with the fitted state and run them through the network.
    /// Missing (non-finite) values are rejected rather than scored.
    pub fn reconstruct(&self, features: &[f64]) -> Result<Reconstruction> {
        if features.len() != self.row_size {
            return Err(ReplicatorError::DimensionMismatch {
                expected: self.row_size,
                got: features.len(),
            });
        }

        if features.iter().any(|v| !v.is_finite()) {
            return Err(ReplicatorError::invalid_dataset("instance has missing feature values"));
        }

        let input = self.normalization.apply(features)?;
        let output = self.network.predict(&input)?;
        Ok(Reconstruction { input, output })
    }
}
