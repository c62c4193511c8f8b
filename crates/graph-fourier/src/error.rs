//! Error types for graph-fourier

use thiserror::Error;

/// Result type alias for graph-fourier operations
pub type Result<T> = std::result::Result<T, GraphFourierError>;

/// Errors that can occur while building a spectral basis or filtering
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphFourierError {
    /// Weight matrix is malformed (not square, asymmetric, negative, ...)
    #[error("Invalid graph: {reason}")]
    InvalidGraph {
        /// What is wrong with the graph
        reason: String,
    },

    /// Eigensolver did not converge or produced an ill-conditioned result
    #[error("Numerical error: {message}")]
    Numerical {
        /// Description of the failure
        message: String,
    },

    /// Signal length does not match the basis dimension
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected dimension (number of vertices)
        expected: usize,
        /// Actual dimension received
        got: usize,
    },

    /// Invalid configuration or filter parameter
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name
        name: String,
        /// Reason why it's invalid
        reason: String,
    },
}

impl GraphFourierError {
    /// Create an invalid graph error
    pub fn invalid_graph(reason: impl Into<String>) -> Self {
        Self::InvalidGraph {
            reason: reason.into(),
        }
    }

    /// Create a numerical error
    pub fn numerical(message: impl Into<String>) -> Self {
        Self::Numerical {
            message: message.into(),
        }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch(expected: usize, got: usize) -> Self {
        Self::DimensionMismatch { expected, got }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
