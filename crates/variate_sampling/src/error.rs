//! Error types for the samplers.
//!
//! This module provides:
//! - `SamplingError`: Failures of the generation algorithms
//! - `ConfigError`: Invalid sampler configuration

use thiserror::Error;
use variate_core::SymbolicError;

/// Configuration error for the samplers.
///
/// Raised by [`SamplerConfigBuilder::build`](crate::SamplerConfigBuilder::build)
/// when a parameter is outside its valid range.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Grid too coarse to bracket a maximum.
    #[error("Invalid grid size {0}: at least 2 points are required")]
    InvalidGridPoints(usize),

    /// Attempt limit of zero can never produce a draw.
    #[error("Invalid attempt limit {0}: must be positive")]
    InvalidMaxAttempts(usize),
}

/// Sampling errors.
///
/// # Variants
/// - `Domain`: Invalid input (modulus, support, bound, density text, distribution parameters)
/// - `Inversion`: The symbolic integral or inverse could not be found
/// - `Exhausted`: A trial or attempt limit was reached before a value was produced
/// - `AmbiguousInverse`: Several inverse branches remain where one was required
/// - `Cancelled`: A cancellation token was triggered
/// - `Config`: Invalid sampler configuration
///
/// # Examples
/// ```
/// use variate_sampling::SamplingError;
///
/// let err = SamplingError::Exhausted { trials: 100 };
/// assert!(err.to_string().contains("100"));
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SamplingError {
    /// Input outside the domain of the algorithm.
    #[error("Domain error: {0}")]
    Domain(String),

    /// Integration or equation solving failed.
    #[error("Inversion failed: {0}")]
    Inversion(String),

    /// No value produced within the allowed number of trials.
    #[error("Sampling exhausted after {trials} trials")]
    Exhausted {
        /// Trials or draws performed.
        trials: usize,
    },

    /// More than one inverse branch is valid.
    #[error("Ambiguous inverse: {branches} candidate branches")]
    AmbiguousInverse {
        /// Number of competing branches.
        branches: usize,
    },

    /// Cooperative cancellation was requested.
    #[error("Sampling cancelled after {trials} trials")]
    Cancelled {
        /// Trials or draws performed before cancellation was observed.
        trials: usize,
    },

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SamplingError {
    /// Shorthand for a [`SamplingError::Domain`] error.
    pub(crate) fn domain(message: impl Into<String>) -> Self {
        SamplingError::Domain(message.into())
    }
}

impl From<SymbolicError> for SamplingError {
    fn from(err: SymbolicError) -> Self {
        match err {
            SymbolicError::Parse { .. }
            | SymbolicError::UnboundSymbol(_)
            | SymbolicError::Evaluation(_) => SamplingError::Domain(err.to_string()),
            SymbolicError::Unsupported { .. } | SymbolicError::NoClosedForm { .. } => {
                SamplingError::Inversion(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_failures_map_to_domain() {
        let err: SamplingError = SymbolicError::Parse {
            position: 3,
            message: "unexpected end of input".to_string(),
        }
        .into();
        assert!(matches!(err, SamplingError::Domain(_)));
        assert!(err.to_string().contains("position 3"));
    }

    #[test]
    fn test_solver_failures_map_to_inversion() {
        let err: SamplingError = SymbolicError::NoClosedForm {
            variable: "x".to_string(),
            equation: "x + exp(x) - r".to_string(),
        }
        .into();
        assert!(matches!(err, SamplingError::Inversion(_)));

        let err: SamplingError = SymbolicError::Unsupported {
            operation: "integration",
            expression: "exp(-x ^ 2)".to_string(),
        }
        .into();
        assert!(matches!(err, SamplingError::Inversion(_)));
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: SamplingError = ConfigError::InvalidGridPoints(1).into();
        assert_eq!(
            err.to_string(),
            "Invalid grid size 1: at least 2 points are required"
        );
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            SamplingError::AmbiguousInverse { branches: 2 }.to_string(),
            "Ambiguous inverse: 2 candidate branches"
        );
        assert_eq!(
            SamplingError::domain("modulus must be positive").to_string(),
            "Domain error: modulus must be positive"
        );
    }
}
