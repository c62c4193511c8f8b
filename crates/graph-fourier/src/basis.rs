//! Graph Fourier basis
//!
//! The eigenvectors of a graph Laplacian play the role of Fourier modes on
//! the vertex domain and the matching eigenvalues act as frequencies. Small
//! eigenvalues belong to modes that vary slowly across edges; the constant
//! vector (eigenvalue 0) is the DC component of every connected component.
//!
//! ## Numerics
//!
//! The full decomposition is delegated to nalgebra's symmetric eigensolver
//! (tridiagonalization + implicit QR), O(N³). Eigenvalues are then sorted
//! ascending with a stable sort, values inside the zero window (including
//! tiny negatives produced by rounding) are snapped to exactly 0.0, and each
//! eigenvector is given a canonical sign.
//!
//! Tolerances are relative: the zero window is `zero_tolerance * max|λ|`.

use nalgebra::{DMatrix, DVector, SymmetricEigen};
use tracing::{debug, warn};

use crate::config::SpectralConfig;
use crate::error::{GraphFourierError, Result};
use crate::graph::Graph;
use crate::laplacian::LaplacianKind;
use crate::signal::Signal;

/// Eigendecomposition of a graph Laplacian, sorted ascending by eigenvalue
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralBasis {
    eigenvalues: Vec<f64>,
    /// Column k is the eigenvector of `eigenvalues[k]`
    eigenvectors: DMatrix<f64>,
    kind: LaplacianKind,
    zero_threshold: f64,
}

impl SpectralBasis {
    /// Number of vertices (and of basis vectors)
    pub fn dim(&self) -> usize {
        self.eigenvalues.len()
    }

    /// Eigenvalues (graph frequencies), ascending
    pub fn eigenvalues(&self) -> &[f64] {
        &self.eigenvalues
    }

    /// Eigenvalue `k`
    ///
    /// # Panics
    ///
    /// Panics if `k >= self.dim()`.
    pub fn eigenvalue(&self, k: usize) -> f64 {
        self.eigenvalues[k]
    }

    /// Eigenvector `k` as per-vertex values
    ///
    /// # Panics
    ///
    /// Panics if `k >= self.dim()`.
    pub fn eigenvector(&self, k: usize) -> Vec<f64> {
        self.eigenvectors.column(k).iter().copied().collect()
    }

    /// Orthonormal eigenvectors as matrix columns
    pub fn eigenvectors(&self) -> &DMatrix<f64> {
        &self.eigenvectors
    }

    /// Laplacian this basis was computed from
    pub fn laplacian_kind(&self) -> LaplacianKind {
        self.kind
    }

    /// Largest eigenvalue
    pub fn lambda_max(&self) -> f64 {
        self.eigenvalues.last().copied().unwrap_or(0.0)
    }

    /// Number of (numerically) zero eigenvalues
    ///
    /// For the combinatorial Laplacian this equals the number of connected
    /// components of the graph.
    pub fn num_components(&self) -> usize {
        self.eigenvalues
            .iter()
            .take_while(|&&lambda| lambda <= self.zero_threshold)
            .count()
    }

    /// Second smallest eigenvalue (Fiedler value), 0 for a single vertex
    pub fn algebraic_connectivity(&self) -> f64 {
        self.eigenvalues.get(1).copied().unwrap_or(0.0)
    }

    /// Forward graph Fourier transform: c_k = <u_k, x>
    pub fn analyze(&self, signal: &Signal) -> Result<Vec<f64>> {
        self.check_dim(signal.len())?;
        let x = DVector::from_column_slice(signal.as_slice());
        let coefficients = self.eigenvectors.tr_mul(&x);
        Ok(coefficients.iter().copied().collect())
    }

    /// Inverse graph Fourier transform: x = Σ_k c_k u_k
    pub fn synthesize(&self, coefficients: &[f64]) -> Result<Signal> {
        self.check_dim(coefficients.len())?;
        let c = DVector::from_column_slice(coefficients);
        let x = &self.eigenvectors * c;
        Ok(Signal::new(x.iter().copied().collect()))
    }

    fn check_dim(&self, got: usize) -> Result<()> {
        if got != self.dim() {
            return Err(GraphFourierError::dimension_mismatch(self.dim(), got));
        }
        Ok(())
    }
}

/// Computes the [`SpectralBasis`] of a graph
#[derive(Debug, Clone, Default)]
pub struct SpectralBasisBuilder {
    config: SpectralConfig,
}

impl SpectralBasisBuilder {
    /// Builder with default tolerances and the combinatorial Laplacian
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder with custom configuration
    pub fn with_config(config: SpectralConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &SpectralConfig {
        &self.config
    }

    /// Compute the full eigendecomposition of the graph's Laplacian
    pub fn build(&self, graph: &Graph) -> Result<SpectralBasis> {
        self.config.validate()?;

        let kind = self.config.laplacian;
        let laplacian = graph.laplacian_of(kind);
        let n = laplacian.dim();

        let (raw_values, raw_vectors) = if n == 1 {
            (vec![laplacian.get(0, 0)], DMatrix::from_element(1, 1, 1.0))
        } else {
            let eigen = SymmetricEigen::try_new(
                laplacian.matrix().clone(),
                self.config.eigen_epsilon,
                self.config.max_iterations,
            )
            .ok_or_else(|| {
                GraphFourierError::numerical(format!(
                    "symmetric eigensolver did not converge within {} iterations (n = {})",
                    self.config.max_iterations, n
                ))
            })?;
            (eigen.eigenvalues.iter().copied().collect(), eigen.eigenvectors)
        };

        let basis = assemble(kind, &raw_values, &raw_vectors, self.config.zero_tolerance)?;

        debug!(
            n,
            ?kind,
            lambda_max = basis.lambda_max(),
            components = basis.num_components(),
            "built spectral basis"
        );

        Ok(basis)
    }
}

/// Sort raw eigenpairs ascending, snap the null space and fix signs
///
/// The zero window is `zero_tolerance * max|λ|`, purely relative to the
/// operator, so uniformly scaling all weights scales the window with them.
fn assemble(
    kind: LaplacianKind,
    raw_values: &[f64],
    raw_vectors: &DMatrix<f64>,
    zero_tolerance: f64,
) -> Result<SpectralBasis> {
    let n = raw_values.len();
    if raw_values.iter().any(|v| !v.is_finite()) || raw_vectors.iter().any(|v| !v.is_finite()) {
        return Err(GraphFourierError::numerical(
            "eigendecomposition produced non-finite values",
        ));
    }

    // Stable: equal eigenvalues keep solver order
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| raw_values[a].total_cmp(&raw_values[b]));

    let scale = raw_values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let zero_threshold = zero_tolerance * scale;

    let mut eigenvalues = Vec::with_capacity(n);
    let mut eigenvectors = DMatrix::zeros(n, n);
    for (k, &src) in order.iter().enumerate() {
        let lambda = raw_values[src];
        if lambda < -zero_threshold {
            return Err(GraphFourierError::numerical(format!(
                "Laplacian eigenvalue {:e} is below -{:e}; matrix is not positive semi-definite",
                lambda, zero_threshold
            )));
        }
        if lambda < -0.5 * zero_threshold {
            warn!(lambda, k, "clamping negative eigenvalue close to tolerance");
        }
        // Snap the null space to exact zeros so `λ > 0` tests are reliable
        eigenvalues.push(if lambda.abs() <= zero_threshold { 0.0 } else { lambda });

        let mut column = raw_vectors.column(src).into_owned();
        canonicalize_sign(&mut column);
        eigenvectors.set_column(k, &column);
    }

    Ok(SpectralBasis {
        eigenvalues,
        eigenvectors,
        kind,
        zero_threshold,
    })
}

/// Flip `v` so its largest-magnitude entry (first on ties) is positive
fn canonicalize_sign(v: &mut DVector<f64>) {
    let mut pivot = 0.0_f64;
    for &x in v.iter() {
        if x.abs() > pivot.abs() {
            pivot = x;
        }
    }
    if pivot < 0.0 {
        v.neg_mut();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::filter::SpectralFilter;

    fn cycle4() -> Graph {
        Graph::from_edges(4, &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 0, 1.0)]).unwrap()
    }

    fn assert_orthonormal(basis: &SpectralBasis) {
        let u = basis.eigenvectors();
        let gram = u.tr_mul(u);
        let n = basis.dim();
        for i in 0..n {
            for j in 0..n {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(gram[(i, j)], expected, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_cycle_spectrum() {
        let basis = SpectralBasisBuilder::new().build(&cycle4()).unwrap();

        let expected = [0.0, 2.0, 2.0, 4.0];
        assert_eq!(basis.dim(), 4);
        for (lambda, want) in basis.eigenvalues().iter().zip(expected) {
            assert_abs_diff_eq!(*lambda, want, epsilon = 1e-9);
        }
        assert_abs_diff_eq!(basis.lambda_max(), 4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(basis.algebraic_connectivity(), 2.0, epsilon = 1e-9);
        assert_eq!(basis.num_components(), 1);
        assert_orthonormal(&basis);
    }

    #[test]
    fn test_constant_mode_first() {
        let basis = SpectralBasisBuilder::new().build(&cycle4()).unwrap();

        // Canonical sign makes the DC mode +1/sqrt(n)
        for v in basis.eigenvector(0) {
            assert_abs_diff_eq!(v, 0.5, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_eigen_equation() {
        let graph = Graph::from_edges(
            5,
            &[(0, 1, 0.5), (1, 2, 2.0), (2, 3, 1.0), (3, 4, 0.25), (0, 4, 1.5), (1, 3, 0.7)],
        )
        .unwrap();
        let basis = SpectralBasisBuilder::new().build(&graph).unwrap();

        for k in 0..basis.dim() {
            let u = basis.eigenvector(k);
            let lu = graph.laplacian().apply(&u).unwrap();
            for (a, b) in lu.iter().zip(u.iter()) {
                assert_abs_diff_eq!(*a, basis.eigenvalue(k) * b, epsilon = 1e-9);
            }
        }
        assert!(basis.eigenvalues().windows(2).all(|w| w[0] <= w[1]));
        assert_orthonormal(&basis);
    }

    #[test]
    fn test_single_vertex() {
        let graph = Graph::from_dense(vec![vec![0.0]]).unwrap();
        let basis = SpectralBasisBuilder::new().build(&graph).unwrap();

        assert_eq!(basis.eigenvalues(), &[0.0]);
        assert_eq!(basis.eigenvector(0), vec![1.0]);
        assert_eq!(basis.num_components(), 1);
        assert_eq!(basis.algebraic_connectivity(), 0.0);
    }

    #[test]
    fn test_disconnected_graph() {
        // Two triangles with no edge between them
        let graph = Graph::from_edges(
            6,
            &[(0, 1, 1.0), (1, 2, 1.0), (2, 0, 1.0), (3, 4, 1.0), (4, 5, 1.0), (5, 3, 1.0)],
        )
        .unwrap();
        let basis = SpectralBasisBuilder::new().build(&graph).unwrap();

        assert_eq!(basis.num_components(), 2);
        assert_eq!(basis.num_components(), graph.num_components());
        assert_abs_diff_eq!(basis.algebraic_connectivity(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(basis.eigenvalue(2), 3.0, epsilon = 1e-9);
        assert_orthonormal(&basis);
    }

    #[test]
    fn test_edgeless_graph() {
        let graph = Graph::from_edges(3, &[]).unwrap();
        let basis = SpectralBasisBuilder::new().build(&graph).unwrap();

        assert_eq!(basis.eigenvalues(), &[0.0, 0.0, 0.0]);
        assert_eq!(basis.num_components(), 3);
        assert_orthonormal(&basis);
    }

    #[test]
    fn test_normalized_spectrum_bounds() {
        let config = SpectralConfig::new().with_laplacian(LaplacianKind::Normalized);
        let basis = SpectralBasisBuilder::with_config(config)
            .build(&cycle4())
            .unwrap();

        assert_eq!(basis.laplacian_kind(), LaplacianKind::Normalized);
        // Bipartite graph: spectrum {0, 1, 1, 2}
        let expected = [0.0, 1.0, 1.0, 2.0];
        for (lambda, want) in basis.eigenvalues().iter().zip(expected) {
            assert_abs_diff_eq!(*lambda, want, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_analyze_synthesize_roundtrip() {
        let basis = SpectralBasisBuilder::new().build(&cycle4()).unwrap();
        let signal = Signal::new(vec![1.0, -2.0, 0.5, 3.0]);

        let coefficients = basis.analyze(&signal).unwrap();
        // DC coefficient is sqrt(n) * mean
        assert_abs_diff_eq!(coefficients[0], 2.0 * signal.mean(), epsilon = 1e-9);

        let restored = basis.synthesize(&coefficients).unwrap();
        for (a, b) in restored.iter().zip(signal.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_transform_dimension_checks() {
        let basis = SpectralBasisBuilder::new().build(&cycle4()).unwrap();
        assert_eq!(
            basis.analyze(&Signal::constant(3, 1.0)),
            Err(GraphFourierError::dimension_mismatch(4, 3))
        );
        assert_eq!(
            basis.synthesize(&[1.0; 5]),
            Err(GraphFourierError::dimension_mismatch(4, 5))
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let builder = SpectralBasisBuilder::with_config(SpectralConfig::new().with_max_iterations(0));
        assert!(matches!(
            builder.build(&cycle4()),
            Err(GraphFourierError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_tiny_weights_keep_spectrum() {
        let w = 1e-10;
        let graph =
            Graph::from_edges(4, &[(0, 1, w), (1, 2, w), (2, 3, w), (3, 0, w)]).unwrap();
        let basis = SpectralBasisBuilder::new().build(&graph).unwrap();

        let expected = [0.0, 2e-10, 2e-10, 4e-10];
        for (lambda, want) in basis.eigenvalues().iter().zip(expected) {
            assert_abs_diff_eq!(*lambda, want, epsilon = 1e-18);
        }
        assert_eq!(basis.eigenvalue(0), 0.0);
        assert!(basis.eigenvalue(1) > 0.0);
        assert_eq!(basis.num_components(), 1);
        assert_eq!(basis.num_components(), graph.num_components());
        assert_abs_diff_eq!(basis.algebraic_connectivity(), 2e-10, epsilon = 1e-18);

        // Keeping only the DC mode still yields the mean
        let signal = Signal::new(vec![1.0, 2.0, 3.0, 6.0]);
        let filtered =
            SpectralFilter::apply(&basis, &signal, |lambda| if lambda > 0.0 { 0.0 } else { 1.0 })
                .unwrap();
        for value in filtered.iter() {
            assert_abs_diff_eq!(*value, 3.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_large_weights_keep_spectrum() {
        let w = 1e6;
        let graph =
            Graph::from_edges(4, &[(0, 1, w), (1, 2, w), (2, 3, w), (3, 0, w)]).unwrap();
        let basis = SpectralBasisBuilder::new().build(&graph).unwrap();

        let expected = [0.0, 2e6, 2e6, 4e6];
        for (lambda, want) in basis.eigenvalues().iter().zip(expected) {
            assert_abs_diff_eq!(*lambda, want, epsilon = 1e-6);
        }
        assert_eq!(basis.num_components(), 1);
    }

    #[test]
    fn test_solver_iteration_limit() {
        let n = 40;
        let weights: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        if i == j {
                            0.0
                        } else {
                            ((i * 7 + j * 7 + i * j) % 11 + 1) as f64
                        }
                    })
                    .collect()
            })
            .collect();
        let graph = Graph::from_dense(weights).unwrap();
        let builder = SpectralBasisBuilder::with_config(SpectralConfig::new().with_max_iterations(1));

        assert!(matches!(
            builder.build(&graph),
            Err(GraphFourierError::Numerical { .. })
        ));
    }

    #[test]
    fn test_assemble_rejects_negative_eigenvalue() {
        let vectors = DMatrix::identity(2, 2);
        let result = assemble(LaplacianKind::Combinatorial, &[-1.0, 2.0], &vectors, 1e-9);
        assert!(matches!(result, Err(GraphFourierError::Numerical { .. })));
    }

    #[test]
    fn test_assemble_rejects_non_finite() {
        let vectors = DMatrix::identity(2, 2);
        let result = assemble(LaplacianKind::Combinatorial, &[0.0, f64::NAN], &vectors, 1e-9);
        assert!(matches!(result, Err(GraphFourierError::Numerical { .. })));
    }

    #[test]
    fn test_assemble_sorts_and_snaps() {
        let vectors = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, -1.0, 0.0]);
        let basis = assemble(LaplacianKind::Combinatorial, &[3.0, -1e-12], &vectors, 1e-9).unwrap();

        assert_eq!(basis.eigenvalues(), &[0.0, 3.0]);
        assert_eq!(basis.eigenvector(0), vec![1.0, 0.0]);
        assert_eq!(basis.eigenvector(1), vec![0.0, 1.0]);
    }

    #[test]
    #[should_panic]
    fn test_eigenvalue_out_of_range_panics() {
        let basis = SpectralBasisBuilder::new().build(&cycle4()).unwrap();
        let _ = basis.eigenvalue(4);
    }

    #[test]
    fn test_canonical_sign() {
        let mut v = DVector::from_vec(vec![0.1, -0.9, 0.3]);
        canonicalize_sign(&mut v);
        assert_eq!(v.as_slice(), &[-0.1, 0.9, -0.3]);
    }
}
