//! Replicator Network
//!
//! Feed-forward network with one sigmoid hidden layer whose output width
//! equals its input width. Trained to reproduce its own input.

use std::fmt;

use ndarray::{Array1, Array2};
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::constants::WEIGHT_INIT_RANGE;
use crate::logic::error::{ReplicatorError, Result};

// ============================================================================
// TOPOLOGY
// ============================================================================

/// Layer widths: inputs == outputs, hidden = inputs - offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    pub inputs: usize,
    pub hidden: usize,
    pub outputs: usize,
}

impl Topology {
    /// Derive the replicator topology, rejecting layouts with no hidden units
    pub fn derive(inputs: usize, hidden_layer_offset: i32) -> Result<Self> {
        let hidden = inputs as i64 - hidden_layer_offset as i64;
        if inputs == 0 || hidden < 1 {
            return Err(ReplicatorError::InvalidTopology {
                inputs,
                offset: hidden_layer_offset,
            });
        }

        Ok(Self {
            inputs,
            hidden: hidden as usize,
            outputs: inputs,
        })
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {} | {}", self.inputs, self.hidden, self.outputs)
    }
}

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

// ============================================================================
// NETWORK
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicatorNetwork {
    topology: Topology,
    /// (hidden x inputs)
    pub(crate) hidden_weights: Array2<f64>,
    pub(crate) hidden_bias: Array1<f64>,
    /// (outputs x hidden)
    pub(crate) output_weights: Array2<f64>,
    pub(crate) output_bias: Array1<f64>,
}

impl ReplicatorNetwork {
    /// New network with weights and biases drawn uniformly from
    /// `[-WEIGHT_INIT_RANGE, WEIGHT_INIT_RANGE]`
    pub fn new(topology: Topology, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let dist = Uniform::new_inclusive(-WEIGHT_INIT_RANGE, WEIGHT_INIT_RANGE);

        let hidden_weights =
            Array2::from_shape_fn((topology.hidden, topology.inputs), |_| rng.sample(dist));
        let hidden_bias = Array1::from_shape_fn(topology.hidden, |_| rng.sample(dist));
        let output_weights =
            Array2::from_shape_fn((topology.outputs, topology.hidden), |_| rng.sample(dist));
        let output_bias = Array1::from_shape_fn(topology.outputs, |_| rng.sample(dist));

        Self {
            topology,
            hidden_weights,
            hidden_bias,
            output_weights,
            output_bias,
        }
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Forward pass returning (hidden activations, outputs)
    pub(crate) fn forward(&self, input: &Array1<f64>) -> (Array1<f64>, Array1<f64>) {
        let hidden = (self.hidden_weights.dot(input) + &self.hidden_bias).mapv(sigmoid);
        let output = (self.output_weights.dot(&hidden) + &self.output_bias).mapv(sigmoid);
        (hidden, output)
    }

    /// Reconstruct a normalized input
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.topology.inputs {
            return Err(ReplicatorError::DimensionMismatch {
                expected: self.topology.inputs,
                got: input.len(),
            });
        }

        let (_, output) = self.forward(&Array1::from(input.to_vec()));
        Ok(output.to_vec())
    }

    /// Weight shapes agree with the declared topology
    pub fn is_consistent(&self) -> bool {
        let t = &self.topology;
        t.inputs == t.outputs
            && self.hidden_weights.dim() == (t.hidden, t.inputs)
            && self.hidden_bias.len() == t.hidden
            && self.output_weights.dim() == (t.outputs, t.hidden)
            && self.output_bias.len() == t.outputs
    }

    pub fn is_finite(&self) -> bool {
        self.hidden_weights.iter().all(|w| w.is_finite())
            && self.hidden_bias.iter().all(|w| w.is_finite())
            && self.output_weights.iter().all(|w| w.is_finite())
            && self.output_bias.iter().all(|w| w.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_offset_expands_hidden_layer() {
        let t = Topology::derive(4, -1).unwrap();
        assert_eq!((t.inputs, t.hidden, t.outputs), (4, 5, 4));
        assert_eq!(t.to_string(), "4 | 5 | 4");
    }

    #[test]
    fn test_positive_offset_bottleneck() {
        let t = Topology::derive(4, 2).unwrap();
        assert_eq!(t.hidden, 2);
    }

    #[test]
    fn test_degenerate_hidden_rejected() {
        assert!(matches!(
            Topology::derive(4, 4),
            Err(ReplicatorError::InvalidTopology { inputs: 4, offset: 4 })
        ));
        assert!(Topology::derive(4, 10).is_err());
        assert!(Topology::derive(0, -1).is_err());
    }

    #[test]
    fn test_init_is_not_degenerate() {
        let net = ReplicatorNetwork::new(Topology::derive(4, -1).unwrap(), 7);
        let first = net.hidden_weights[[0, 0]];
        assert!(net.hidden_weights.iter().any(|&w| w != first));
        assert!(net
            .hidden_weights
            .iter()
            .all(|w| w.abs() <= WEIGHT_INIT_RANGE));
        assert!(net.is_consistent());
    }

    #[test]
    fn test_same_seed_same_weights() {
        let t = Topology::derive(3, -1).unwrap();
        assert_eq!(ReplicatorNetwork::new(t, 42), ReplicatorNetwork::new(t, 42));
        assert_ne!(ReplicatorNetwork::new(t, 42), ReplicatorNetwork::new(t, 43));
    }

    #[test]
    fn test_predict_is_pure() {
        let net = ReplicatorNetwork::new(Topology::derive(3, -1).unwrap(), 1);
        let a = net.predict(&[0.1, 0.5, 0.9]).unwrap();
        let b = net.predict(&[0.1, 0.5, 0.9]).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        assert!(a.iter().all(|v| *v > 0.0 && *v < 1.0));
    }

    #[test]
    fn test_predict_dimension_mismatch() {
        let net = ReplicatorNetwork::new(Topology::derive(3, -1).unwrap(), 1);
        assert!(matches!(
            net.predict(&[0.1, 0.5]),
            Err(ReplicatorError::DimensionMismatch { expected: 3, got: 2 })
        ));
    }

    #[test]
    fn test_sigmoid() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(10.0) > 0.99);
        assert!(sigmoid(-10.0) < 0.01);
    }
}
