//! CLI error types.

use thiserror::Error;
use variate_core::SymbolicError;
use variate_sampling::{ConfigError as SamplerConfigError, SamplingError};

use crate::config::ConfigError;

/// Errors surfaced by the `variate` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file or environment problem.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid sampler settings derived from the configuration.
    #[error("Sampler configuration error: {0}")]
    SamplerConfig(#[from] SamplerConfigError),

    /// A generation algorithm failed.
    #[error(transparent)]
    Sampling(#[from] SamplingError),

    /// Expression text could not be handled.
    #[error("Expression error: {0}")]
    Symbolic(#[from] SymbolicError),

    /// Inconsistent command-line arguments.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Output serialisation failed.
    #[error("Serialisation error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
