//! Sampler configuration.
//!
//! This module provides [`SamplerConfig`], built and validated through
//! [`SamplerConfigBuilder`], and the [`CancellationToken`] checked between
//! trials.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{ConfigError, SamplingError};

/// Default number of grid points used to estimate a density supremum.
pub const DEFAULT_GRID_POINTS: usize = 10_000;

/// Default cap on uniform draws per inverse-transform batch.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1_000_000;

/// Shared flag for cooperative cancellation.
///
/// Clones observe the same flag, so a token handed to a sampler can be
/// triggered from another thread.
///
/// ```rust
/// use variate_sampling::CancellationToken;
///
/// let token = CancellationToken::new();
/// let observer = token.clone();
/// token.cancel();
/// assert!(observer.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates an untriggered token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Sampler configuration.
///
/// Immutable configuration shared by the acceptance-rejection and
/// inverse-transform samplers. Use [`SamplerConfigBuilder`] to construct
/// instances; [`Default`] gives the documented defaults.
///
/// # Examples
///
/// ```rust
/// use variate_sampling::SamplerConfig;
///
/// let config = SamplerConfig::builder()
///     .grid_points(2_000)
///     .max_attempts(Some(50_000))
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.grid_points(), 2_000);
/// assert!(config.refine_supremum());
/// ```
#[derive(Clone, Debug)]
pub struct SamplerConfig {
    /// Grid points for the supremum search.
    grid_points: usize,
    /// Refine the grid maximum via critical points of the density.
    refine_supremum: bool,
    /// Cap on draws per inverse-transform batch (`None` for unbounded).
    max_attempts: Option<usize>,
    /// Optional seed for reproducibility.
    seed: Option<u64>,
    /// Optional cancellation token.
    cancellation: Option<CancellationToken>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            grid_points: DEFAULT_GRID_POINTS,
            refine_supremum: true,
            max_attempts: Some(DEFAULT_MAX_ATTEMPTS),
            seed: None,
            cancellation: None,
        }
    }
}

impl SamplerConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SamplerConfigBuilder {
        SamplerConfigBuilder::default()
    }

    /// Returns the number of grid points for the supremum search.
    #[inline]
    pub fn grid_points(&self) -> usize {
        self.grid_points
    }

    /// Returns whether the grid maximum is refined with the root finder.
    #[inline]
    pub fn refine_supremum(&self) -> bool {
        self.refine_supremum
    }

    /// Returns the cap on draws per inverse-transform batch.
    #[inline]
    pub fn max_attempts(&self) -> Option<usize> {
        self.max_attempts
    }

    /// Returns the optional seed for reproducibility.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the attached cancellation token, if any.
    #[inline]
    pub fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancellation.as_ref()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `grid_points` is below 2
    /// - `max_attempts` is `Some(0)`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_points < 2 {
            return Err(ConfigError::InvalidGridPoints(self.grid_points));
        }
        if self.max_attempts == Some(0) {
            return Err(ConfigError::InvalidMaxAttempts(0));
        }
        Ok(())
    }

    /// Fails with [`SamplingError::Cancelled`] if cancellation was requested.
    #[inline]
    pub(crate) fn check_cancelled(&self, trials: usize) -> Result<(), SamplingError> {
        match &self.cancellation {
            Some(token) if token.is_cancelled() => Err(SamplingError::Cancelled { trials }),
            _ => Ok(()),
        }
    }
}

/// Builder for [`SamplerConfig`].
///
/// Unset fields take the defaults of [`SamplerConfig::default`].
#[derive(Clone, Debug, Default)]
pub struct SamplerConfigBuilder {
    grid_points: Option<usize>,
    refine_supremum: Option<bool>,
    max_attempts: Option<Option<usize>>,
    seed: Option<u64>,
    cancellation: Option<CancellationToken>,
}

impl SamplerConfigBuilder {
    /// Sets the number of grid points (at least 2).
    #[inline]
    pub fn grid_points(mut self, grid_points: usize) -> Self {
        self.grid_points = Some(grid_points);
        self
    }

    /// Enables or disables derivative-based refinement of the supremum.
    #[inline]
    pub fn refine_supremum(mut self, refine: bool) -> Self {
        self.refine_supremum = Some(refine);
        self
    }

    /// Sets the draw cap per inverse-transform batch; `None` removes it.
    #[inline]
    pub fn max_attempts(mut self, max_attempts: Option<usize>) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Sets the seed for reproducibility.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Attaches a cancellation token.
    #[inline]
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails (see [`SamplerConfig::validate`]).
    pub fn build(self) -> Result<SamplerConfig, ConfigError> {
        let defaults = SamplerConfig::default();
        let config = SamplerConfig {
            grid_points: self.grid_points.unwrap_or(defaults.grid_points),
            refine_supremum: self.refine_supremum.unwrap_or(defaults.refine_supremum),
            max_attempts: self.max_attempts.unwrap_or(defaults.max_attempts),
            seed: self.seed,
            cancellation: self.cancellation,
        };

        config.validate()?;
        Ok(config)
    }
}
