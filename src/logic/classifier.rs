//! Replicator Classifier
//!
//! Training and scoring entry points. Holds an immutable config and the
//! current `TrainedModel` behind a read/write lock: scoring takes a cheap
//! `Arc` snapshot, a successful retrain swaps it, a failed one leaves it.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::logic::config::ReplicatorConfig;
use crate::logic::dataset::{validate_for_scoring, validate_for_training, Dataset, Header, Instance};
use crate::logic::error::{ReplicatorError, Result};
use crate::logic::events::{LogObserver, TrainingObserver};
use crate::logic::features::NormalizationState;
use crate::logic::model::{
    self, AnomalyScore, DistanceThreshold, ReplicatorNetwork, Topology, TrainedModel, Trainer,
    TrainingParams, TrainingReport,
};

/// Build a trained model from a dataset.
///
/// Validation (config, dataset capabilities, topology) all happens before
/// the first epoch runs.
pub fn fit(
    dataset: &Dataset,
    config: &ReplicatorConfig,
    observer: &mut dyn TrainingObserver,
) -> Result<(TrainedModel, TrainingReport)> {
    config.validate()?;
    validate_for_training(dataset, config.min_instances)?;

    // Evaluate the network length
    let row_size = dataset.feature_count();
    let topology = Topology::derive(row_size, config.hidden_layer_offset)?;

    let normalization = NormalizationState::fit(dataset)?;
    let samples = normalization.apply_dataset(dataset)?;

    let network = ReplicatorNetwork::new(topology, config.seed);
    let trainer = Trainer::new(TrainingParams::from(config));
    let (network, report) = trainer.train(network, &samples, observer)?;

    let model = TrainedModel::new(network, normalization, &report)?;
    Ok((model, report))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassifierState {
    Untrained,
    Trained,
}

pub struct ReplicatorClassifier {
    config: ReplicatorConfig,
    threshold: DistanceThreshold,
    model: RwLock<Option<Arc<TrainedModel>>>,
}

impl ReplicatorClassifier {
    pub fn new(config: ReplicatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            threshold: DistanceThreshold::new(config.distance_threshold)?,
            config,
            model: RwLock::new(None),
        })
    }

    /// Restore a classifier around a previously trained model
    pub fn with_model(config: ReplicatorConfig, model: TrainedModel) -> Result<Self> {
        model.validate()?;
        let classifier = Self::new(config)?;
        *classifier.model.write() = Some(Arc::new(model));
        Ok(classifier)
    }

    pub fn config(&self) -> &ReplicatorConfig {
        &self.config
    }

    pub fn threshold(&self) -> DistanceThreshold {
        self.threshold
    }

    pub fn state(&self) -> ClassifierState {
        if self.model.read().is_some() {
            ClassifierState::Trained
        } else {
            ClassifierState::Untrained
        }
    }

    /// Snapshot of the current model
    pub fn model(&self) -> Option<Arc<TrainedModel>> {
        self.model.read().clone()
    }

    /// Train with log-backed progress events
    pub fn build_classifier(&self, dataset: &Dataset) -> Result<TrainingReport> {
        let mut observer = LogObserver::new(self.config.progress_interval);
        self.build_classifier_with(dataset, &mut observer)
    }

    /// Train and replace the held model. On any error the previous model stays.
    pub fn build_classifier_with(
        &self,
        dataset: &Dataset,
        observer: &mut dyn TrainingObserver,
    ) -> Result<TrainingReport> {
        let (model, report) = fit(dataset, &self.config, observer)?;
        log::info!("Training finished: {} samples processed", dataset.len());

        *self.model.write() = Some(Arc::new(model));
        Ok(report)
    }

    /// Score one instance; also exposes the reconstruction distance
    pub fn score_instance(&self, header: &Header, instance: &Instance) -> Result<AnomalyScore> {
        let snapshot = self.model().ok_or(ReplicatorError::ModelNotBuilt)?;
        validate_for_scoring(header)?;
        model::score(&snapshot, &instance.features, self.threshold)
    }

    /// `[1 - anomaly score, anomaly score]`
    pub fn distribution_for_instance(&self, header: &Header, instance: &Instance) -> Result<[f64; 2]> {
        Ok(self.score_instance(header, instance)?.distribution())
    }

    pub fn options(&self) -> Vec<String> {
        self.config.options()
    }
}

impl Default for ReplicatorClassifier {
    fn default() -> Self {
        Self {
            config: ReplicatorConfig::default(),
            threshold: DistanceThreshold::default(),
            model: RwLock::new(None),
        }
    }
}

impl fmt::Display for ReplicatorClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.model.read().as_ref() {
            None => write!(f, "No model built yet."),
            Some(model) => write!(f, "Neural network: {}", model.topology()),
        }
    }
}

impl fmt::Debug for ReplicatorClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplicatorClassifier")
            .field("config", &self.config)
            .field("state", &self.state())
            .finish()
    }
}
