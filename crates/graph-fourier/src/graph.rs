//! Weighted undirected graph
//!
//! A [`Graph`] owns a validated symmetric weight matrix and caches its
//! combinatorial Laplacian. It is immutable: a changed graph is a new value
//! carrying a new Laplacian.

use std::borrow::Cow;

use nalgebra::DMatrix;

use crate::config::SpectralConfig;
use crate::error::{GraphFourierError, Result};
use crate::laplacian::{Laplacian, LaplacianKind};

/// Weighted undirected graph on `n` vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    weights: DMatrix<f64>,
    laplacian: Laplacian,
}

impl Graph {
    /// Build from a nested row-major weight matrix
    pub fn from_dense(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::from_dense_with_config(rows, &SpectralConfig::default())
    }

    /// Build from a nested row-major weight matrix with custom tolerances
    pub fn from_dense_with_config(rows: Vec<Vec<f64>>, config: &SpectralConfig) -> Result<Self> {
        let n = rows.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(GraphFourierError::invalid_graph(format!(
                "weight matrix is not square: row {} has {} entries, expected {}",
                i,
                row.len(),
                n
            )));
        }
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        Self::from_adjacency_with_config(&flat, n, config)
    }

    /// Build from a flat row-major `n × n` adjacency matrix
    pub fn from_adjacency(adj: &[f64], n: usize) -> Result<Self> {
        Self::from_adjacency_with_config(adj, n, &SpectralConfig::default())
    }

    /// Build from a flat row-major adjacency matrix with custom tolerances
    pub fn from_adjacency_with_config(
        adj: &[f64],
        n: usize,
        config: &SpectralConfig,
    ) -> Result<Self> {
        config.validate()?;
        if n == 0 {
            return Err(GraphFourierError::invalid_graph(
                "graph must have at least one vertex",
            ));
        }
        if adj.len() != n * n {
            return Err(GraphFourierError::invalid_graph(format!(
                "weight matrix is not square: {} entries for {} vertices",
                adj.len(),
                n
            )));
        }

        let weights = DMatrix::from_row_slice(n, n, adj);
        validate_weights(&weights, config.symmetry_tolerance)?;

        // Within tolerance, so averaging only removes rounding asymmetry.
        // Halve before adding so weights near f64::MAX stay finite.
        let weights = &weights * 0.5 + weights.transpose() * 0.5;
        Self::from_valid_weights(weights)
    }

    /// Build from an undirected edge list `(u, v, weight)`
    ///
    /// Duplicate edges accumulate. Self-loops, out-of-range endpoints,
    /// negative or non-finite weights and sums that overflow are rejected.
    pub fn from_edges(n: usize, edges: &[(usize, usize, f64)]) -> Result<Self> {
        if n == 0 {
            return Err(GraphFourierError::invalid_graph(
                "graph must have at least one vertex",
            ));
        }

        let mut weights = DMatrix::<f64>::zeros(n, n);
        for &(u, v, w) in edges {
            if u >= n || v >= n {
                return Err(GraphFourierError::invalid_graph(format!(
                    "edge ({}, {}) references a vertex outside 0..{}",
                    u, v, n
                )));
            }
            if u == v {
                return Err(GraphFourierError::invalid_graph(format!(
                    "self-loop on vertex {}",
                    u
                )));
            }
            if !w.is_finite() || w < 0.0 {
                return Err(GraphFourierError::invalid_graph(format!(
                    "edge ({}, {}) has invalid weight {}",
                    u, v, w
                )));
            }
            weights[(u, v)] += w;
            weights[(v, u)] += w;
            if !weights[(u, v)].is_finite() {
                return Err(GraphFourierError::invalid_graph(format!(
                    "accumulated weight of edge ({}, {}) overflows",
                    u, v
                )));
            }
        }

        Self::from_valid_weights(weights)
    }

    fn from_valid_weights(weights: DMatrix<f64>) -> Result<Self> {
        if let Some(i) = weights.row_iter().position(|row| !row.sum().is_finite()) {
            return Err(GraphFourierError::invalid_graph(format!(
                "degree of vertex {} overflows",
                i
            )));
        }
        let laplacian = Laplacian::from_weights(&weights, LaplacianKind::Combinatorial);
        Ok(Self { weights, laplacian })
    }

    /// Number of vertices
    pub fn num_vertices(&self) -> usize {
        self.weights.nrows()
    }

    /// Number of undirected edges with positive weight
    pub fn num_edges(&self) -> usize {
        let n = self.num_vertices();
        (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .filter(|&(i, j)| self.weights[(i, j)] > 0.0)
            .count()
    }

    /// Symmetric weight matrix
    pub fn weights(&self) -> &DMatrix<f64> {
        &self.weights
    }

    /// Weight of edge (i, j), zero when absent
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is not below `self.num_vertices()`.
    pub fn weight(&self, i: usize, j: usize) -> f64 {
        self.weights[(i, j)]
    }

    /// Weighted degree of every vertex
    pub fn degrees(&self) -> Vec<f64> {
        self.weights.row_iter().map(|row| row.sum()).collect()
    }

    /// Cached combinatorial Laplacian L = D - W
    pub fn laplacian(&self) -> &Laplacian {
        &self.laplacian
    }

    /// Laplacian of the requested kind (cached for the combinatorial one)
    pub fn laplacian_of(&self, kind: LaplacianKind) -> Cow<'_, Laplacian> {
        match kind {
            LaplacianKind::Combinatorial => Cow::Borrowed(&self.laplacian),
            other => Cow::Owned(Laplacian::from_weights(&self.weights, other)),
        }
    }

    /// Number of connected components (isolated vertices count as one each)
    pub fn num_components(&self) -> usize {
        let n = self.num_vertices();
        let mut seen = vec![false; n];
        let mut stack = Vec::new();
        let mut components = 0;

        for start in 0..n {
            if seen[start] {
                continue;
            }
            components += 1;
            seen[start] = true;
            stack.push(start);
            while let Some(u) = stack.pop() {
                for v in 0..n {
                    if !seen[v] && self.weights[(u, v)] > 0.0 {
                        seen[v] = true;
                        stack.push(v);
                    }
                }
            }
        }

        components
    }
}

fn validate_weights(weights: &DMatrix<f64>, symmetry_tolerance: f64) -> Result<()> {
    let n = weights.nrows();
    for i in 0..n {
        for j in 0..n {
            let w = weights[(i, j)];
            if !w.is_finite() {
                return Err(GraphFourierError::invalid_graph(format!(
                    "non-finite weight at ({}, {})",
                    i, j
                )));
            }
            if w < 0.0 {
                return Err(GraphFourierError::invalid_graph(format!(
                    "negative weight {} at ({}, {})",
                    w, i, j
                )));
            }
            if i == j && w != 0.0 {
                return Err(GraphFourierError::invalid_graph(format!(
                    "non-zero diagonal weight {} at vertex {}",
                    w, i
                )));
            }
            if j > i && (w - weights[(j, i)]).abs() > symmetry_tolerance {
                return Err(GraphFourierError::invalid_graph(format!(
                    "weight matrix is not symmetric at ({}, {}): {} vs {}",
                    i,
                    j,
                    w,
                    weights[(j, i)]
                )));
            }
        }
    }
    Ok(())
}
