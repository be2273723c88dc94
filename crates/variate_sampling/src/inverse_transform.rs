//! # Inverse-Transform Sampling
//!
//! Pushes uniforms through a quantile function: `X = Q(U)`. The quantile
//! comes either from the distribution catalogue or from a user-supplied
//! symbolic inverse CDF.
//!
//! Candidates that fall outside an optional [`Clamp`] are discarded and
//! redrawn. A non-finite candidate is tolerated only as an isolated event
//! (a quantile's infinite endpoint); once they make up more than
//! [`NON_FINITE_TOLERANCE`] of the draws the batch fails instead of
//! silently covering part of the distribution. The draw loop is capped by
//! [`SamplerConfig::max_attempts`] so an empty clamp window cannot spin
//! forever.

use rayon::prelude::*;
use tracing::{debug, trace, warn};
use variate_core::symbolic::Expr;

use crate::catalog::DistributionSpec;
use crate::config::SamplerConfig;
use crate::error::SamplingError;
use crate::rng::{UniformSource, VariateRng};

/// Largest share of draws allowed to produce a non-finite candidate.
pub const NON_FINITE_TOLERANCE: f64 = 1e-3;

/// Non-finite candidates accepted before [`NON_FINITE_TOLERANCE`] is enforced.
const NON_FINITE_GRACE: usize = 8;

/// Symbol assumed for a constant user inverse.
pub const DEFAULT_LEVEL: &str = "r";

/// Optional bounds on accepted variates.
///
/// # Examples
///
/// ```rust
/// use variate_sampling::Clamp;
///
/// let clamp = Clamp::new(Some(0.0), None).unwrap();
/// assert!(clamp.admits(3.0));
/// assert!(!clamp.admits(-0.1));
/// assert!(Clamp::new(Some(2.0), Some(1.0)).is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clamp {
    lower: Option<f64>,
    upper: Option<f64>,
}

impl Clamp {
    /// Creates a clamp; either side may be open.
    ///
    /// # Errors
    ///
    /// [`SamplingError::Domain`] if a bound is NaN or `lower > upper`.
    pub fn new(lower: Option<f64>, upper: Option<f64>) -> Result<Self, SamplingError> {
        if lower.is_some_and(f64::is_nan) || upper.is_some_and(f64::is_nan) {
            return Err(SamplingError::domain("clamp bounds must not be NaN"));
        }
        if let (Some(lo), Some(hi)) = (lower, upper) {
            if lo > hi {
                return Err(SamplingError::domain(format!(
                    "clamp lower bound {} exceeds upper bound {}",
                    lo, hi
                )));
            }
        }
        Ok(Self { lower, upper })
    }

    /// A clamp that admits every value.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Lower bound, if any.
    pub fn lower(&self) -> Option<f64> {
        self.lower
    }

    /// Upper bound, if any.
    pub fn upper(&self) -> Option<f64> {
        self.upper
    }

    /// Returns `true` if `x` lies within the bounds (inclusive).
    #[inline]
    pub fn admits(&self, x: f64) -> bool {
        self.lower.map_or(true, |lo| x >= lo) && self.upper.map_or(true, |hi| x <= hi)
    }
}

/// Inverse-transform sampler.
///
/// # Examples
///
/// ```rust
/// use variate_sampling::{Clamp, DistributionSpec, InverseTransform, SamplerConfig, VariateRng};
///
/// let sampler = InverseTransform::new(SamplerConfig::default());
/// let mut rng = VariateRng::from_seed(7);
/// let spec = DistributionSpec::new("norm", vec![]);
/// let clamp = Clamp::new(Some(0.0), None).unwrap();
///
/// let draws = sampler.sample_catalog(&mut rng, 100, &spec, &clamp).unwrap();
/// assert_eq!(draws.len(), 100);
/// assert!(draws.iter().all(|&x| x >= 0.0));
/// ```
#[derive(Clone, Debug, Default)]
pub struct InverseTransform {
    config: SamplerConfig,
}

impl InverseTransform {
    /// Creates a sampler with the given configuration.
    pub fn new(config: SamplerConfig) -> Self {
        Self { config }
    }

    /// The sampler configuration.
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Draws `n` variates from a catalogue distribution.
    ///
    /// # Errors
    ///
    /// - [`SamplingError::Domain`] for an invalid distribution request
    /// - [`SamplingError::Exhausted`] when `max_attempts` draws do not yield `n` values
    /// - [`SamplingError::Cancelled`] if the configured token is triggered
    pub fn sample_catalog<R: UniformSource>(
        &self,
        rng: &mut R,
        n: usize,
        spec: &DistributionSpec,
        clamp: &Clamp,
    ) -> Result<Vec<f64>, SamplingError> {
        let distribution = spec.build()?;
        debug!(distribution = %spec, n, "catalogue sampling");
        self.sample_quantile(rng, n, |u| distribution.quantile(u), clamp)
    }

    /// Draws `n` variates through a symbolic inverse CDF.
    ///
    /// The inverse is compiled once over its free variable (conventionally
    /// `r`).
    ///
    /// # Errors
    ///
    /// - [`SamplingError::Domain`] if the inverse has more than one free variable
    /// - [`SamplingError::Exhausted`] when `max_attempts` draws do not yield `n` values
    /// - [`SamplingError::Cancelled`] if the configured token is triggered
    pub fn sample_user_inverse<R: UniformSource>(
        &self,
        rng: &mut R,
        n: usize,
        inverse: &Expr,
        clamp: &Clamp,
    ) -> Result<Vec<f64>, SamplingError> {
        let symbols: Vec<String> = inverse.free_symbols().into_iter().collect();
        let level = match symbols.as_slice() {
            [] => DEFAULT_LEVEL,
            [only] => only.as_str(),
            _ => {
                return Err(SamplingError::domain(format!(
                    "inverse must have one free variable, found {}",
                    symbols.join(", ")
                )))
            }
        };
        let compiled = inverse.compile(level)?;
        debug!(inverse = %inverse, level, n, "user inverse sampling");
        self.sample_quantile(rng, n, |u| compiled.eval(u), clamp)
    }

    /// Draws `n` variates through an arbitrary quantile function.
    ///
    /// # Errors
    ///
    /// - [`SamplingError::Domain`] when the quantile is non-finite on more
    ///   than [`NON_FINITE_TOLERANCE`] of the draws
    /// - [`SamplingError::Exhausted`] when `max_attempts` draws do not yield `n` values
    /// - [`SamplingError::Cancelled`] if the configured token is triggered
    pub fn sample_quantile<R, Q>(
        &self,
        rng: &mut R,
        n: usize,
        quantile: Q,
        clamp: &Clamp,
    ) -> Result<Vec<f64>, SamplingError>
    where
        R: UniformSource,
        Q: Fn(f64) -> f64,
    {
        let limit = self.config.max_attempts();
        let mut variates = Vec::with_capacity(n);
        let mut attempts = 0usize;
        let mut non_finite = 0usize;

        while variates.len() < n {
            if limit.is_some_and(|max| attempts >= max) {
                debug!(attempts, accepted = variates.len(), n, "attempt limit reached");
                return Err(SamplingError::Exhausted { trials: attempts });
            }
            self.config.check_cancelled(attempts)?;

            let u = rng.next_uniform();
            attempts += 1;
            let x = quantile(u);

            if !x.is_finite() {
                non_finite += 1;
                if non_finite >= NON_FINITE_GRACE
                    && non_finite as f64 > NON_FINITE_TOLERANCE * attempts as f64
                {
                    return Err(SamplingError::domain(format!(
                        "quantile is not finite for {} of {} uniform levels (last at u = {})",
                        non_finite, attempts, u
                    )));
                }
                continue;
            }
            if !clamp.admits(x) {
                continue;
            }
            trace!(u, x, "variate accepted");
            variates.push(x);
        }

        if non_finite > 0 {
            warn!(
                non_finite,
                attempts,
                fraction = non_finite as f64 / attempts as f64,
                "non-finite quantile values were redrawn"
            );
        }
        debug!(n, attempts, non_finite, "inverse-transform batch complete");
        Ok(variates)
    }

    /// Draws `streams` independent catalogue batches in parallel.
    ///
    /// Stream `i` uses `VariateRng::stream(seed, i)`, so the output is
    /// identical to running the streams one after another.
    ///
    /// # Errors
    ///
    /// As [`sample_catalog`](Self::sample_catalog); the first failing
    /// stream's error is returned.
    pub fn sample_catalog_streams(
        &self,
        seed: u64,
        streams: usize,
        n_per_stream: usize,
        spec: &DistributionSpec,
        clamp: &Clamp,
    ) -> Result<Vec<Vec<f64>>, SamplingError> {
        let distribution = spec.build()?;
        (0..streams)
            .into_par_iter()
            .map(|index| {
                let mut rng = VariateRng::stream(seed, index as u64);
                self.sample_quantile(&mut rng, n_per_stream, |u| distribution.quantile(u), clamp)
            })
            .collect()
    }
}

/// [`InverseTransform::sample_catalog`] with the default configuration.
pub fn sample_catalog<R: UniformSource>(
    rng: &mut R,
    n: usize,
    spec: &DistributionSpec,
    clamp: &Clamp,
) -> Result<Vec<f64>, SamplingError> {
    InverseTransform::default().sample_catalog(rng, n, spec, clamp)
}

/// [`InverseTransform::sample_user_inverse`] with the default configuration.
pub fn sample_user_inverse<R: UniformSource>(
    rng: &mut R,
    n: usize,
    inverse: &Expr,
    clamp: &Clamp,
) -> Result<Vec<f64>, SamplingError> {
    InverseTransform::default().sample_user_inverse(rng, n, inverse, clamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CancellationToken;
    use crate::lcg::{CongruentialGenerator, RecurrenceParams};
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_zero_variates() {
        let mut rng = VariateRng::from_seed(1);
        let draws = sample_catalog(&mut rng, 0, &DistributionSpec::new("norm", vec![]), &Clamp::unbounded())
            .unwrap();
        assert!(draws.is_empty());
    }

    #[test]
    fn test_user_inverse_uniform() {
        let inverse = Expr::parse("2 + 3*r").unwrap();
        let mut rng = VariateRng::from_seed(11);
        let draws = sample_user_inverse(&mut rng, 1_000, &inverse, &Clamp::unbounded()).unwrap();
        assert!(draws.iter().all(|&x| (2.0..5.0).contains(&x)));
        let mean = draws.iter().sum::<f64>() / draws.len() as f64;
        assert_relative_eq!(mean, 3.5, epsilon = 0.1);
    }

    #[test]
    fn test_user_inverse_follows_uniform_source() {
        // Midpoints of the 16-cell LCG feed Q(r) = 10 r exactly
        let inverse = Expr::parse("10*r").unwrap();
        let mut lcg = CongruentialGenerator::new(RecurrenceParams::new(5, 3, 16, 1, 0)).unwrap();
        let draws = sample_user_inverse(&mut lcg, 3, &inverse, &Clamp::unbounded()).unwrap();
        assert_relative_eq!(draws[0], 10.0 * 8.5 / 16.0, epsilon = 1e-12);
        assert_relative_eq!(draws[1], 10.0 * 11.5 / 16.0, epsilon = 1e-12);
        assert_relative_eq!(draws[2], 10.0 * 10.5 / 16.0, epsilon = 1e-12);
    }

    #[test]
    fn test_user_inverse_in_other_variable() {
        let inverse = Expr::parse("-ln(1 - u)").unwrap();
        let mut rng = VariateRng::from_seed(5);
        let draws = sample_user_inverse(&mut rng, 50, &inverse, &Clamp::unbounded()).unwrap();
        assert!(draws.iter().all(|&x| x >= 0.0));
    }

    #[test]
    fn test_user_inverse_with_two_symbols() {
        let inverse = Expr::parse("a*r").unwrap();
        let mut rng = VariateRng::from_seed(5);
        assert!(matches!(
            sample_user_inverse(&mut rng, 5, &inverse, &Clamp::unbounded()),
            Err(SamplingError::Domain(_))
        ));
    }

    #[test]
    fn test_inverse_undefined_on_half_the_levels_fails() {
        // NaN for every r < 0.5
        let inverse = Expr::parse("sqrt(r - 0.5)").unwrap();
        let mut rng = VariateRng::from_seed(9);
        let err = sample_user_inverse(&mut rng, 200, &inverse, &Clamp::unbounded()).unwrap_err();
        assert!(matches!(err, SamplingError::Domain(_)));
    }

    #[test]
    fn test_isolated_non_finite_candidate_is_redrawn() {
        // Full-period generator mod 4096 visits state 0 once per cycle;
        // the quantile is infinite at that single level.
        let mut lcg =
            CongruentialGenerator::new(RecurrenceParams::new(5, 1, 4096, 1, 0)).unwrap();
        let sampler = InverseTransform::default();
        let draws = sampler
            .sample_quantile(
                &mut lcg,
                4095,
                |u| if u < 1.0 / 4096.0 { f64::NEG_INFINITY } else { u },
                &Clamp::unbounded(),
            )
            .unwrap();
        assert_eq!(draws.len(), 4095);
        assert!(draws.iter().all(|&x| x >= 1.0 / 4096.0));
    }

    #[test]
    fn test_empty_clamp_window_exhausts() {
        let sampler = InverseTransform::new(
            SamplerConfig::builder().max_attempts(Some(500)).build().unwrap(),
        );
        let mut rng = VariateRng::from_seed(3);
        let clamp = Clamp::new(Some(10.0), Some(11.0)).unwrap();
        let err = sampler
            .sample_catalog(&mut rng, 1, &DistributionSpec::new("uniform", vec![]), &clamp)
            .unwrap_err();
        assert_eq!(err, SamplingError::Exhausted { trials: 500 });
    }

    #[test]
    fn test_unknown_distribution() {
        let mut rng = VariateRng::from_seed(3);
        let err = sample_catalog(&mut rng, 5, &DistributionSpec::new("zipf", vec![]), &Clamp::unbounded())
            .unwrap_err();
        assert!(matches!(err, SamplingError::Domain(_)));
    }

    #[test]
    fn test_cancellation() {
        let token = CancellationToken::new();
        token.cancel();
        let sampler =
            InverseTransform::new(SamplerConfig::builder().cancellation(token).build().unwrap());
        let mut rng = VariateRng::from_seed(3);
        let err = sampler
            .sample_catalog(&mut rng, 5, &DistributionSpec::new("norm", vec![]), &Clamp::unbounded())
            .unwrap_err();
        assert_eq!(err, SamplingError::Cancelled { trials: 0 });
    }

    #[test]
    fn test_parallel_streams_match_sequential() {
        let sampler = InverseTransform::default();
        let spec = DistributionSpec::new("expon", vec![]);
        let clamp = Clamp::unbounded();
        let parallel = sampler.sample_catalog_streams(42, 4, 50, &spec, &clamp).unwrap();
        assert_eq!(parallel.len(), 4);
        for (index, batch) in parallel.iter().enumerate() {
            let mut rng = VariateRng::stream(42, index as u64);
            let sequential = sampler.sample_catalog(&mut rng, 50, &spec, &clamp).unwrap();
            assert_eq!(batch, &sequential);
        }
    }

    #[test]
    fn test_clamp_validation() {
        assert!(Clamp::new(Some(f64::NAN), None).is_err());
        assert!(Clamp::new(Some(1.0), Some(1.0)).is_ok());
        let clamp = Clamp::new(None, Some(2.0)).unwrap();
        assert!(clamp.admits(f64::NEG_INFINITY));
        assert!(clamp.admits(2.0));
        assert!(!clamp.admits(2.5));
    }

    proptest! {
        #[test]
        fn prop_clamped_samples_stay_in_bounds(
            seed in any::<u64>(),
            lower in -2.0f64..0.0,
            width in 0.5f64..3.0,
        ) {
            let clamp = Clamp::new(Some(lower), Some(lower + width)).unwrap();
            let mut rng = VariateRng::from_seed(seed);
            let draws = sample_catalog(&mut rng, 20, &DistributionSpec::new("norm", vec![]), &clamp)
                .unwrap();
            prop_assert_eq!(draws.len(), 20);
            prop_assert!(draws.iter().all(|&x| x >= lower && x <= lower + width));
        }
    }
}
