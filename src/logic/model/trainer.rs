//! Autoencoder Trainer
//!
//! Online backpropagation with momentum. Every sample is its own target.
//! Each epoch walks the training set in order and reports the mean squared
//! reconstruction error accumulated during that pass.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::logic::config::ReplicatorConfig;
use crate::logic::error::{ReplicatorError, Result};
use crate::logic::events::TrainingObserver;
use super::network::ReplicatorNetwork;

/// Why the training loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Error fell to or below `max_error`
    Converged,
    /// Ran `max_epochs` without converging
    EpochLimit,
    /// Observer requested a stop
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub epochs: usize,
    pub final_error: f64,
    pub stop_reason: StopReason,
}

impl TrainingReport {
    pub fn converged(&self) -> bool {
        self.stop_reason == StopReason::Converged
    }
}

/// Training loop settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingParams {
    pub max_epochs: usize,
    pub max_error: f64,
    pub learning_rate: f64,
    pub momentum: f64,
}

impl From<&ReplicatorConfig> for TrainingParams {
    fn from(config: &ReplicatorConfig) -> Self {
        Self {
            max_epochs: config.max_epochs,
            max_error: config.max_error,
            learning_rate: config.learning_rate,
            momentum: config.momentum,
        }
    }
}

impl Default for TrainingParams {
    fn default() -> Self {
        (&ReplicatorConfig::default()).into()
    }
}

/// Previous weight changes, carried over by momentum
struct Velocity {
    hidden_weights: Array2<f64>,
    hidden_bias: Array1<f64>,
    output_weights: Array2<f64>,
    output_bias: Array1<f64>,
}

impl Velocity {
    fn zeros_like(network: &ReplicatorNetwork) -> Self {
        Self {
            hidden_weights: Array2::zeros(network.hidden_weights.raw_dim()),
            hidden_bias: Array1::zeros(network.hidden_bias.len()),
            output_weights: Array2::zeros(network.output_weights.raw_dim()),
            output_bias: Array1::zeros(network.output_bias.len()),
        }
    }
}

fn outer(a: &Array1<f64>, b: &Array1<f64>) -> Array2<f64> {
    Array2::from_shape_fn((a.len(), b.len()), |(i, j)| a[i] * b[j])
}

pub struct Trainer {
    params: TrainingParams,
}

impl Trainer {
    pub fn new(params: TrainingParams) -> Self {
        Self { params }
    }

    /// Train `network` to reproduce `samples` (already normalized).
    ///
    /// Fails with `TrainingDidNotConverge` when the network error stops being
    /// finite; hitting the epoch limit is reported, not an error.
    pub fn train(
        &self,
        mut network: ReplicatorNetwork,
        samples: &[Vec<f64>],
        observer: &mut dyn TrainingObserver,
    ) -> Result<(ReplicatorNetwork, TrainingReport)> {
        let width = network.topology().inputs;
        if samples.is_empty() {
            return Err(ReplicatorError::invalid_dataset("no training samples"));
        }
        if let Some(bad) = samples.iter().find(|s| s.len() != width) {
            return Err(ReplicatorError::DimensionMismatch { expected: width, got: bad.len() });
        }

        let inputs: Vec<Array1<f64>> = samples.iter().map(|s| Array1::from(s.clone())).collect();
        let normalizer = (inputs.len() * width) as f64;
        let mut velocity = Velocity::zeros_like(&network);

        observer.on_start(&network.topology(), inputs.len());

        let mut epoch = 0;
        let report = loop {
            epoch += 1;

            let mut squared_sum = 0.0;
            for input in &inputs {
                squared_sum += self.step(&mut network, &mut velocity, input);
            }
            let error = squared_sum / normalizer;

            if !error.is_finite() {
                observer.on_diverged(epoch);
                return Err(ReplicatorError::TrainingDidNotConverge { epochs: epoch });
            }

            observer.on_epoch(epoch, error);

            let stop_reason = if error <= self.params.max_error {
                Some(StopReason::Converged)
            } else if epoch >= self.params.max_epochs {
                Some(StopReason::EpochLimit)
            } else if observer.should_stop() {
                Some(StopReason::Cancelled)
            } else {
                None
            };

            if let Some(stop_reason) = stop_reason {
                break TrainingReport {
                    epochs: epoch,
                    final_error: error,
                    stop_reason,
                };
            }
        };

        observer.on_finish(&report);
        Ok((network, report))
    }

    /// One backpropagation step on a single sample; returns its squared error
    fn step(&self, network: &mut ReplicatorNetwork, velocity: &mut Velocity, input: &Array1<f64>) -> f64 {
        let TrainingParams { learning_rate, momentum, .. } = self.params;

        let (hidden, output) = network.forward(input);
        let error = input - &output;
        let squared = error.dot(&error);

        let output_delta = &error * &output.mapv(|o| o * (1.0 - o));
        let hidden_delta = network.output_weights.t().dot(&output_delta) * hidden.mapv(|h| h * (1.0 - h));

        // Output layer
        velocity.output_weights *= momentum;
        velocity.output_weights.scaled_add(learning_rate, &outer(&output_delta, &hidden));
        velocity.output_bias *= momentum;
        velocity.output_bias.scaled_add(learning_rate, &output_delta);
        network.output_weights += &velocity.output_weights;
        network.output_bias += &velocity.output_bias;

        // Hidden layer
        velocity.hidden_weights *= momentum;
        velocity.hidden_weights.scaled_add(learning_rate, &outer(&hidden_delta, input));
        velocity.hidden_bias *= momentum;
        velocity.hidden_bias.scaled_add(learning_rate, &hidden_delta);
        network.hidden_weights += &velocity.hidden_weights;
        network.hidden_bias += &velocity.hidden_bias;

        squared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::events::NoopObserver;
    use crate::logic::model::Topology;

    fn line_samples(rows: usize) -> Vec<Vec<f64>> {
        (0..rows)
            .map(|k| {
                let t = k as f64 / (rows - 1) as f64;
                vec![t, 1.0 - t, t, 1.0 - t]
            })
            .collect()
    }

    #[derive(Default)]
    struct Recorder {
        started: bool,
        errors: Vec<f64>,
        finished: Option<TrainingReport>,
        stop_after: Option<usize>,
    }

    impl TrainingObserver for Recorder {
        fn on_start(&mut self, _topology: &Topology, _rows: usize) {
            self.started = true;
        }
        fn on_epoch(&mut self, _epoch: usize, error: f64) {
            self.errors.push(error);
        }
        fn on_finish(&mut self, report: &TrainingReport) {
            self.finished = Some(report.clone());
        }
        fn should_stop(&self) -> bool {
            self.stop_after.map(|n| self.errors.len() >= n).unwrap_or(false)
        }
    }

    fn network() -> ReplicatorNetwork {
        ReplicatorNetwork::new(Topology::derive(4, -1).unwrap(), 1)
    }

    #[test]
    fn test_converges_on_line() {
        let trainer = Trainer::new(TrainingParams::default());
        let mut recorder = Recorder::default();

        let (_, report) = trainer.train(network(), &line_samples(100), &mut recorder).unwrap();

        assert!(report.converged());
        assert!(report.final_error <= 0.001);
        assert!(report.epochs < 1000);
        assert!(recorder.started);
        assert_eq!(recorder.errors.len(), report.epochs);
        assert_eq!(recorder.finished, Some(report));
    }

    #[test]
    fn test_error_decreases() {
        let trainer = Trainer::new(TrainingParams { max_epochs: 50, max_error: 0.0, ..Default::default() });
        let mut recorder = Recorder::default();

        trainer.train(network(), &line_samples(100), &mut recorder).unwrap();

        let first = recorder.errors[0];
        let last = *recorder.errors.last().unwrap();
        assert!(last < first);
    }

    #[test]
    fn test_epoch_limit_is_not_an_error() {
        let trainer = Trainer::new(TrainingParams { max_epochs: 3, max_error: 0.0, ..Default::default() });

        let (_, report) = trainer.train(network(), &line_samples(100), &mut NoopObserver).unwrap();

        assert_eq!(report.epochs, 3);
        assert_eq!(report.stop_reason, StopReason::EpochLimit);
        assert!(report.final_error.is_finite());
    }

    #[test]
    fn test_cancel_between_epochs() {
        let trainer = Trainer::new(TrainingParams { max_error: 0.0, ..Default::default() });
        let mut recorder = Recorder { stop_after: Some(5), ..Default::default() };

        let (_, report) = trainer.train(network(), &line_samples(100), &mut recorder).unwrap();

        assert_eq!(report.epochs, 5);
        assert_eq!(report.stop_reason, StopReason::Cancelled);
    }

    #[test]
    fn test_divergence_is_reported() {
        let trainer = Trainer::new(TrainingParams::default());
        let samples = vec![vec![f64::NAN, 0.0, 0.0, 0.0]; 10];

        let result = trainer.train(network(), &samples, &mut NoopObserver);
        assert!(matches!(result, Err(ReplicatorError::TrainingDidNotConverge { epochs: 1 })));
    }

    #[test]
    fn test_rejects_wrong_width() {
        let trainer = Trainer::new(TrainingParams::default());
        let samples = vec![vec![0.0, 1.0]];

        assert!(matches!(
            trainer.train(network(), &samples, &mut NoopObserver),
            Err(ReplicatorError::DimensionMismatch { expected: 4, got: 2 })
        ));
        assert!(trainer.train(network(), &[], &mut NoopObserver).is_err());
    }
}
