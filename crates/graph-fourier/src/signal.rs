//! Vertex signals

use rand::prelude::*;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::error::{GraphFourierError, Result};

/// One real value per vertex, indexed like the graph's vertices
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signal(Vec<f64>);

impl Signal {
    /// Wrap per-vertex values
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Constant signal of length `n`
    pub fn constant(n: usize, value: f64) -> Self {
        Self(vec![value; n])
    }

    /// Number of vertices covered
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the signal has no values
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Values as a slice
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Iterate over values
    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.0.iter()
    }

    /// Take the underlying values
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    /// Arithmetic mean (0 for an empty signal)
    pub fn mean(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.0.iter().sum::<f64>() / self.0.len() as f64
    }

    /// Euclidean norm
    pub fn norm(&self) -> f64 {
        self.0.iter().map(|&v| v * v).sum::<f64>().sqrt()
    }

    /// Copy of this signal with i.i.d. Gaussian noise of std `sigma` added
    ///
    /// The same seed always produces the same noise.
    pub fn with_gaussian_noise(&self, sigma: f64, seed: u64) -> Result<Self> {
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(GraphFourierError::invalid_parameter(
                "sigma",
                "must be finite and >= 0",
            ));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let noisy = self
            .0
            .iter()
            .map(|&v| {
                let z: f64 = rng.sample(StandardNormal);
                v + sigma * z
            })
            .collect();
        Ok(Self(noisy))
    }

    /// Signal-to-noise ratio in dB of `self` measured against `reference`
    ///
    /// Returns `f64::INFINITY` when the two signals are identical.
    pub fn snr_db(&self, reference: &Signal) -> Result<f64> {
        if self.len() != reference.len() {
            return Err(GraphFourierError::dimension_mismatch(
                reference.len(),
                self.len(),
            ));
        }

        let signal_power: f64 = reference.iter().map(|&r| r * r).sum();
        let noise_power: f64 = self
            .iter()
            .zip(reference.iter())
            .map(|(&x, &r)| (x - r) * (x - r))
            .sum();

        if noise_power == 0.0 {
            return Ok(f64::INFINITY);
        }
        Ok(10.0 * (signal_power / noise_power).log10())
    }
}

impl From<Vec<f64>> for Signal {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl From<&[f64]> for Signal {
    fn from(values: &[f64]) -> Self {
        Self(values.to_vec())
    }
}

impl AsRef<[f64]> for Signal {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

impl std::ops::Index<usize> for Signal {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a Signal {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
