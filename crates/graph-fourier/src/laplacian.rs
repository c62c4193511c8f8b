//! Graph Laplacian operators
//!
//! The combinatorial Laplacian `L = D - W` is the default. Its quadratic
//! form `xᵀLx = Σ_{i<j} w_ij (x_i - x_j)²` measures how much a vertex
//! signal varies across edges, which is what makes its eigenvectors a
//! frequency basis.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::{GraphFourierError, Result};

/// Laplacian normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaplacianKind {
    /// Unnormalized: L = D - W
    #[default]
    Combinatorial,
    /// Symmetric: L_sym = I - D^{-1/2} W D^{-1/2}
    Normalized,
}

/// Dense Laplacian of a weighted undirected graph
#[derive(Debug, Clone, PartialEq)]
pub struct Laplacian {
    matrix: DMatrix<f64>,
    kind: LaplacianKind,
}

impl Laplacian {
    /// Build from a validated symmetric weight matrix
    pub(crate) fn from_weights(weights: &DMatrix<f64>, kind: LaplacianKind) -> Self {
        let n = weights.nrows();
        let degrees: Vec<f64> = weights.row_iter().map(|row| row.sum()).collect();

        let matrix = match kind {
            LaplacianKind::Combinatorial => {
                DMatrix::from_fn(n, n, |i, j| {
                    if i == j {
                        degrees[i] - weights[(i, i)]
                    } else {
                        -weights[(i, j)]
                    }
                })
            }
            LaplacianKind::Normalized => {
                // Isolated vertices get d^{-1/2} = 0, leaving a zero row/column
                let inv_sqrt: Vec<f64> = degrees
                    .iter()
                    .map(|&d| if d > 0.0 { 1.0 / d.sqrt() } else { 0.0 })
                    .collect();
                DMatrix::from_fn(n, n, |i, j| {
                    let scaled = inv_sqrt[i] * weights[(i, j)] * inv_sqrt[j];
                    if i == j {
                        if degrees[i] > 0.0 {
                            1.0 - scaled
                        } else {
                            0.0
                        }
                    } else {
                        -scaled
                    }
                })
            }
        };

        Self { matrix, kind }
    }

    /// Which normalization produced this operator
    pub fn kind(&self) -> LaplacianKind {
        self.kind
    }

    /// Number of vertices
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// Dense matrix view
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Entry L[i][j]
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is not below `self.dim()`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.matrix[(i, j)]
    }

    /// Sum of each row (all zero for the combinatorial Laplacian)
    pub fn row_sums(&self) -> Vec<f64> {
        self.matrix.row_iter().map(|row| row.sum()).collect()
    }

    /// Apply Laplacian to vector: y = L * x
    pub fn apply(&self, x: &[f64]) -> Result<Vec<f64>> {
        self.check_len(x)?;
        let y = &self.matrix * DVector::from_column_slice(x);
        Ok(y.iter().copied().collect())
    }

    /// Dirichlet energy xᵀLx (smoothness of a vertex signal)
    pub fn quadratic_form(&self, x: &[f64]) -> Result<f64> {
        let y = self.apply(x)?;
        Ok(x.iter().zip(y.iter()).map(|(&a, &b)| a * b).sum())
    }

    fn check_len(&self, x: &[f64]) -> Result<()> {
        if x.len() != self.dim() {
            return Err(GraphFourierError::dimension_mismatch(self.dim(), x.len()));
        }
        Ok(())
    }
}
