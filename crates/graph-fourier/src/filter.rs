//! Spectral filtering of vertex signals
//!
//! A filter is a gain `g(λ)` over graph frequencies. Filtering a signal
//! `x` computes `y = U g(Λ) Uᵀ x`: project onto the Fourier basis, scale
//! each coefficient by the gain of its eigenvalue, and synthesize.
//!
//! Any `Fn(f64) -> f64` works as a gain. [`FilterKernel`] collects the
//! common shapes as plain values that can be stored in configuration.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::basis::{SpectralBasis, SpectralBasisBuilder};
use crate::error::{GraphFourierError, Result};
use crate::graph::Graph;
use crate::signal::Signal;

/// Common spectral gain shapes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterKernel {
    /// Ideal low-pass window: 1 for λ <= cutoff, 0 above
    LowPass { cutoff: f64 },
    /// Ideal high-pass window: 0 for λ <= cutoff, 1 above
    HighPass { cutoff: f64 },
    /// Ideal band-pass window: 1 for low <= λ <= high
    BandPass { low: f64, high: f64 },
    /// Heat diffusion: exp(-t*λ)
    Heat { time: f64 },
    /// Tikhonov denoiser 1 / (1 + τλ), minimizer of ‖y - x‖² + τ xᵀLx
    Tikhonov { tau: f64 },
    /// Pass everything unchanged
    Identity,
}

impl FilterKernel {
    /// Gain at frequency `lambda`
    pub fn gain(&self, lambda: f64) -> f64 {
        match *self {
            FilterKernel::LowPass { cutoff } => {
                if lambda <= cutoff {
                    1.0
                } else {
                    0.0
                }
            }
            FilterKernel::HighPass { cutoff } => {
                if lambda <= cutoff {
                    0.0
                } else {
                    1.0
                }
            }
            FilterKernel::BandPass { low, high } => {
                if (low..=high).contains(&lambda) {
                    1.0
                } else {
                    0.0
                }
            }
            FilterKernel::Heat { time } => (-time * lambda).exp(),
            FilterKernel::Tikhonov { tau } => 1.0 / (1.0 + tau * lambda),
            FilterKernel::Identity => 1.0,
        }
    }

    /// Check parameters are finite and in range
    pub fn validate(&self) -> Result<()> {
        let check = |name: &str, value: f64| {
            if !value.is_finite() || value < 0.0 {
                Err(GraphFourierError::invalid_parameter(
                    name,
                    "must be finite and >= 0",
                ))
            } else {
                Ok(())
            }
        };

        match *self {
            FilterKernel::LowPass { cutoff } | FilterKernel::HighPass { cutoff } => {
                check("cutoff", cutoff)
            }
            FilterKernel::BandPass { low, high } => {
                check("low", low)?;
                check("high", high)?;
                if low > high {
                    return Err(GraphFourierError::invalid_parameter(
                        "low",
                        format!("must not exceed high ({} > {})", low, high),
                    ));
                }
                Ok(())
            }
            FilterKernel::Heat { time } => check("time", time),
            FilterKernel::Tikhonov { tau } => check("tau", tau),
            FilterKernel::Identity => Ok(()),
        }
    }
}

/// Analysis, per-frequency weighting and synthesis over a [`SpectralBasis`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SpectralFilter;

impl SpectralFilter {
    /// Filter `signal` with gain `filter_fn`, returning a new signal
    pub fn apply<F>(basis: &SpectralBasis, signal: &Signal, filter_fn: F) -> Result<Signal>
    where
        F: Fn(f64) -> f64,
    {
        let mut coefficients = basis.analyze(signal)?;
        let gains = Self::frequency_response(basis, filter_fn)?;

        for (c, g) in coefficients.iter_mut().zip(gains.iter()) {
            *c *= g;
        }

        trace!(n = basis.dim(), "applied spectral filter");
        basis.synthesize(&coefficients)
    }

    /// Filter `signal` with one of the preset kernels
    pub fn apply_kernel(
        basis: &SpectralBasis,
        signal: &Signal,
        kernel: &FilterKernel,
    ) -> Result<Signal> {
        kernel.validate()?;
        Self::apply(basis, signal, |lambda| kernel.gain(lambda))
    }

    /// Gain of `filter_fn` at every eigenvalue of `basis`
    pub fn frequency_response<F>(basis: &SpectralBasis, filter_fn: F) -> Result<Vec<f64>>
    where
        F: Fn(f64) -> f64,
    {
        basis
            .eigenvalues()
            .iter()
            .map(|&lambda| {
                let g = filter_fn(lambda);
                if g.is_finite() {
                    Ok(g)
                } else {
                    Err(GraphFourierError::numerical(format!(
                        "filter gain at eigenvalue {} is not finite ({})",
                        lambda, g
                    )))
                }
            })
            .collect()
    }
}

/// A spectral basis paired with a preset kernel
#[derive(Debug, Clone)]
pub struct GraphFilter {
    basis: SpectralBasis,
    kernel: FilterKernel,
}

impl GraphFilter {
    /// Create graph filter from a basis and kernel
    pub fn new(basis: SpectralBasis, kernel: FilterKernel) -> Result<Self> {
        kernel.validate()?;
        Ok(Self { basis, kernel })
    }

    /// Build the basis of `graph` with default settings and attach `kernel`
    pub fn from_graph(graph: &Graph, kernel: FilterKernel) -> Result<Self> {
        let basis = SpectralBasisBuilder::new().build(graph)?;
        Self::new(basis, kernel)
    }

    /// Apply filter to signal: y = g(L) x
    pub fn apply(&self, signal: &Signal) -> Result<Signal> {
        SpectralFilter::apply_kernel(&self.basis, signal, &self.kernel)
    }

    /// Apply filter multiple times (for stronger effect)
    pub fn apply_n(&self, signal: &Signal, n_times: usize) -> Result<Signal> {
        let mut result = signal.clone();
        for _ in 0..n_times {
            result = self.apply(&result)?;
        }
        Ok(result)
    }

    /// Filter energy: xᵀ g(L) x
    pub fn energy(&self, signal: &Signal) -> Result<f64> {
        let filtered = self.apply(signal)?;
        Ok(signal
            .iter()
            .zip(filtered.iter())
            .map(|(&x, &y)| x * y)
            .sum())
    }

    /// Underlying Fourier basis
    pub fn basis(&self) -> &SpectralBasis {
        &self.basis
    }

    /// Kernel in use
    pub fn kernel(&self) -> &FilterKernel {
        &self.kernel
    }
}

/// Bank of kernels sharing one basis
#[derive(Debug, Clone)]
pub struct MultiscaleFilter {
    basis: SpectralBasis,
    kernels: Vec<FilterKernel>,
}

impl MultiscaleFilter {
    /// Create a bank from arbitrary kernels
    pub fn new(basis: SpectralBasis, kernels: Vec<FilterKernel>) -> Result<Self> {
        for kernel in &kernels {
            kernel.validate()?;
        }
        Ok(Self { basis, kernels })
    }

    /// Heat diffusion at each of the given times
    pub fn heat_scales(basis: SpectralBasis, scales: &[f64]) -> Result<Self> {
        let kernels = scales
            .iter()
            .map(|&time| FilterKernel::Heat { time })
            .collect();
        Self::new(basis, kernels)
    }

    /// One filtered signal per kernel, in kernel order
    pub fn apply_all(&self, signal: &Signal) -> Result<Vec<Signal>> {
        // Analyze once, reweight per kernel
        let coefficients = self.basis.analyze(signal)?;
        self.kernels
            .iter()
            .map(|kernel| {
                let gains =
                    SpectralFilter::frequency_response(&self.basis, |lambda| kernel.gain(lambda))?;
                let weighted: Vec<f64> = coefficients
                    .iter()
                    .zip(gains.iter())
                    .map(|(c, g)| c * g)
                    .collect();
                self.basis.synthesize(&weighted)
            })
            .collect()
    }

    /// Kernels in the bank
    pub fn kernels(&self) -> &[FilterKernel] {
        &self.kernels
    }
}
