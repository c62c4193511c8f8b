//! Configuration for Laplacian construction and eigendecomposition

use serde::{Deserialize, Serialize};

use crate::laplacian::LaplacianKind;

/// Tolerances and solver limits shared by graph validation and basis building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectralConfig {
    /// Maximum allowed |W_ij - W_ji| for a weight matrix to count as symmetric
    pub symmetry_tolerance: f64,
    /// Eigenvalues within this distance of zero are treated as zero
    pub zero_tolerance: f64,
    /// Convergence epsilon handed to the symmetric eigensolver
    pub eigen_epsilon: f64,
    /// Maximum eigensolver iterations before reporting non-convergence
    pub max_iterations: usize,
    /// Which Laplacian the basis is computed from
    pub laplacian: LaplacianKind,
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self {
            symmetry_tolerance: 1e-9,
            zero_tolerance: 1e-9,
            eigen_epsilon: f64::EPSILON,
            max_iterations: 10_000,
            laplacian: LaplacianKind::Combinatorial,
        }
    }
}

impl SpectralConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the symmetry tolerance
    pub fn with_symmetry_tolerance(mut self, tol: f64) -> Self {
        self.symmetry_tolerance = tol;
        self
    }

    /// Set the zero-eigenvalue tolerance
    pub fn with_zero_tolerance(mut self, tol: f64) -> Self {
        self.zero_tolerance = tol;
        self
    }

    /// Set the eigensolver convergence epsilon
    pub fn with_eigen_epsilon(mut self, eps: f64) -> Self {
        self.eigen_epsilon = eps;
        self
    }

    /// Set the maximum eigensolver iterations
    pub fn with_max_iterations(mut self, max_iter: usize) -> Self {
        self.max_iterations = max_iter;
        self
    }

    /// Set the Laplacian kind
    pub fn with_laplacian(mut self, kind: LaplacianKind) -> Self {
        self.laplacian = kind;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::Result<()> {
        for (name, value) in [
            ("symmetry_tolerance", self.symmetry_tolerance),
            ("zero_tolerance", self.zero_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(crate::GraphFourierError::invalid_parameter(
                    name,
                    "must be finite and >= 0",
                ));
            }
        }
        if !self.eigen_epsilon.is_finite() || self.eigen_epsilon <= 0.0 {
            return Err(crate::GraphFourierError::invalid_parameter(
                "eigen_epsilon",
                "must be finite and > 0",
            ));
        }
        // nalgebra treats 0 as "iterate until convergence"
        if self.max_iterations == 0 {
            return Err(crate::GraphFourierError::invalid_parameter(
                "max_iterations",
                "must be > 0",
            ));
        }
        Ok(())
    }
}
