//! # graph-fourier
//!
//! Fourier analysis of signals that live on the vertices of a weighted,
//! undirected graph.
//!
//! ## Pipeline
//!
//! ```text
//! Graph ──► SpectralBasisBuilder ──► SpectralBasis (λ_k, u_k)
//!                                        │
//!               Signal x ──► SpectralFilter(g) ──► Signal y = U g(Λ) Uᵀ x
//! ```
//!
//! - [`Graph`] validates a symmetric, non-negative weight matrix and caches
//!   its Laplacian `L = D - W`.
//! - [`SpectralBasisBuilder`] computes the full eigendecomposition of `L`,
//!   sorted ascending by eigenvalue (the graph frequencies).
//! - [`SpectralFilter`] projects a [`Signal`] onto the basis, applies a gain
//!   per frequency and reconstructs a new signal.
//!
//! Everything is a pure function over immutable values; nothing is shared
//! between calls.
//!
//! ## Quick Start
//!
//! ```rust
//! use graph_fourier::{Graph, Signal, SpectralBasisBuilder, SpectralFilter};
//!
//! // 4-cycle: 0-1-2-3-0
//! let graph = Graph::from_edges(4, &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 0, 1.0)])?;
//! let basis = SpectralBasisBuilder::new().build(&graph)?;
//! assert!((basis.lambda_max() - 4.0).abs() < 1e-9);
//!
//! // Keep only the zero frequency: the result is the mean everywhere
//! let signal = Signal::new(vec![1.0, 2.0, 3.0, 6.0]);
//! let smooth = SpectralFilter::apply(&basis, &signal, |lambda| if lambda > 0.0 { 0.0 } else { 1.0 })?;
//! assert!(smooth.iter().all(|&v| (v - 3.0).abs() < 1e-9));
//! # Ok::<(), graph_fourier::GraphFourierError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod basis;
pub mod config;
pub mod error;
pub mod filter;
pub mod graph;
pub mod laplacian;
pub mod signal;

pub use basis::{SpectralBasis, SpectralBasisBuilder};
pub use config::SpectralConfig;
pub use error::{GraphFourierError, Result};
pub use filter::{FilterKernel, GraphFilter, MultiscaleFilter, SpectralFilter};
pub use graph::Graph;
pub use laplacian::{Laplacian, LaplacianKind};
pub use signal::Signal;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::basis::*;
    pub use crate::config::*;
    pub use crate::error::*;
    pub use crate::filter::*;
    pub use crate::graph::*;
    pub use crate::laplacian::*;
    pub use crate::signal::*;
}
