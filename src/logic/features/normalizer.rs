//! Min-Max Normalizer
//!
//! Maps each feature column linearly onto `[LOWER_BOUND, UPPER_BOUND]` using the
//! min/max observed at fit time. Values outside the fitted range are not clamped,
//! so an out-of-range instance stays far from anything the network reproduces.

use serde::{Deserialize, Serialize};

use crate::logic::dataset::Dataset;
use crate::logic::error::{ReplicatorError, Result};

/// Lower bound of the normalized range
pub const LOWER_BOUND: f64 = 0.0;

/// Upper bound of the normalized range
pub const UPPER_BOUND: f64 = 1.0;

/// Per-feature min/max fitted from training data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationState {
    pub min_vals: Vec<f64>,
    pub max_vals: Vec<f64>,
}

impl NormalizationState {
    /// Fit min/max per feature column of the dataset
    pub fn fit(dataset: &Dataset) -> Result<Self> {
        Self::fit_rows(dataset.feature_count(), dataset.rows())
    }

    /// Fit min/max from raw rows of `width` features
    pub fn fit_rows<'a, I>(width: usize, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a [f64]>,
    {
        let mut min_vals = vec![f64::INFINITY; width];
        let mut max_vals = vec![f64::NEG_INFINITY; width];
        let mut count = 0usize;

        for row in rows {
            if row.len() != width {
                return Err(ReplicatorError::DimensionMismatch { expected: width, got: row.len() });
            }
            for (i, &value) in row.iter().enumerate() {
                min_vals[i] = min_vals[i].min(value);
                max_vals[i] = max_vals[i].max(value);
            }
            count += 1;
        }

        if count == 0 {
            return Err(ReplicatorError::invalid_dataset("cannot fit normalization on zero rows"));
        }

        Ok(Self { min_vals, max_vals })
    }

    /// Number of features this state was fitted on
    pub fn width(&self) -> usize {
        self.min_vals.len()
    }

    /// Normalize a single value of column `index`.
    ///
    /// Only an exactly constant column is degenerate: it maps onto the middle
    /// of the range, shifted by the raw deviation from the fitted constant.
    /// Any nonzero spread, however small, is rescaled like every other column.
    pub fn apply_value(&self, index: usize, value: f64) -> f64 {
        let min_val = self.min_vals[index];
        let range = self.max_vals[index] - min_val;

        if range == 0.0 {
            (LOWER_BOUND + UPPER_BOUND) / 2.0 + (value - min_val)
        } else {
            LOWER_BOUND + (value - min_val) / range * (UPPER_BOUND - LOWER_BOUND)
        }
    }

    /// Normalize a feature vector with the fitted (never refitted) state
    pub fn apply(&self, features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != self.width() {
            return Err(ReplicatorError::DimensionMismatch {
                expected: self.width(),
                got: features.len(),
            });
        }

        Ok(features
            .iter()
            .enumerate()
            .map(|(i, &v)| self.apply_value(i, v))
            .collect())
    }

    /// Normalize every row of a dataset
    pub fn apply_dataset(&self, dataset: &Dataset) -> Result<Vec<Vec<f64>>> {
        dataset.rows().map(|row| self.apply(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> NormalizationState {
        let rows: Vec<Vec<f64>> = vec![vec![0.0, 10.0, 3.0], vec![5.0, 20.0, 3.0], vec![10.0, 15.0, 3.0]];
        NormalizationState::fit_rows(3, rows.iter().map(|r| r.as_slice())).unwrap()
    }

    #[test]
    fn test_fit_min_max() {
        let s = state();
        assert_eq!(s.min_vals, vec![0.0, 10.0, 3.0]);
        assert_eq!(s.max_vals, vec![10.0, 20.0, 3.0]);
    }

    #[test]
    fn test_bounds_map_to_range_ends() {
        let s = state();
        let low = s.apply(&[0.0, 10.0, 3.0]).unwrap();
        let high = s.apply(&[10.0, 20.0, 3.0]).unwrap();
        assert_eq!(&low[..2], &[LOWER_BOUND, LOWER_BOUND]);
        assert_eq!(&high[..2], &[UPPER_BOUND, UPPER_BOUND]);
        assert_eq!(s.apply_value(0, 5.0), 0.5);
    }

    #[test]
    fn test_out_of_range_is_not_clamped() {
        let s = state();
        assert_eq!(s.apply_value(0, 20.0), 2.0);
        assert_eq!(s.apply_value(0, -10.0), -1.0);
    }

    #[test]
    fn test_constant_column_is_stable() {
        let s = state();
        assert_eq!(s.apply_value(2, 3.0), 0.5);
        assert_eq!(s.apply_value(2, 4.0), 1.5);
        assert!(s.apply_value(2, 3.0).is_finite());
    }

    #[test]
    fn test_tiny_spread_is_not_constant() {
        let rows: Vec<Vec<f64>> = vec![vec![1.0], vec![1.0 + 1e-14]];
        let s = NormalizationState::fit_rows(1, rows.iter().map(|r| r.as_slice())).unwrap();

        assert_eq!(s.apply_value(0, 1.0), LOWER_BOUND);
        assert_eq!(s.apply_value(0, 1.0 + 1e-14), UPPER_BOUND);
    }

    #[test]
    fn test_dimension_mismatch() {
        let s = state();
        assert!(matches!(
            s.apply(&[1.0, 2.0]),
            Err(ReplicatorError::DimensionMismatch { expected: 3, got: 2 })
        ));
    }

    #[test]
    fn test_fit_empty_rows() {
        let rows: Vec<&[f64]> = Vec::new();
        assert!(NormalizationState::fit_rows(2, rows).is_err());
    }
}
