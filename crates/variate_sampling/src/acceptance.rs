//! # Acceptance-Rejection Sampling
//!
//! Draws a candidate uniformly on the support and keeps it with
//! probability `f(x) / m`, where `m` bounds the density from above.
//!
//! Two entry points differ in where `m` comes from and in how exhaustion is
//! reported:
//!
//! | Variant | Bound | Exhaustion |
//! |---------|-------|------------|
//! | [`AcceptanceRejection::sample_with_bound`] | caller | `Err(SamplingError::Exhausted)` |
//! | [`AcceptanceRejection::sample_auto_bound`] | grid search | `Ok(None)` |
//!
//! The automatic bound is the maximum of the density over an equally spaced
//! grid, refined (by default) with critical points of the symbolic
//! derivative located by Brent's method, so narrow peaks between grid
//! points are not underestimated.

use tracing::{debug, trace, warn};
use variate_core::math::solvers::BrentSolver;
use variate_core::symbolic::{differentiate, CompiledExpr, Expr};

use crate::config::SamplerConfig;
use crate::density::{Density, Support};
use crate::error::SamplingError;
use crate::rng::UniformSource;

/// An accepted candidate.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Acceptance {
    /// The variate `x`.
    pub candidate: f64,
    /// The density value `f(x)` at the variate.
    pub density: f64,
    /// The bound `m` used in the acceptance test.
    pub bound: f64,
    /// Trials used, including the accepted one.
    pub trials: usize,
    /// Uniform that placed the candidate on the support.
    pub u1: f64,
    /// Uniform compared against `f(x) / m`.
    pub u2: f64,
}

/// Acceptance-rejection sampler.
///
/// # Examples
///
/// ```rust
/// use variate_sampling::{AcceptanceRejection, Density, SamplerConfig, Support, VariateRng};
///
/// let sampler = AcceptanceRejection::new(SamplerConfig::default());
/// let density = Density::parse("1.0/50.0 * (x - 10.0)").unwrap();
/// let support = Support::new(10.0, 20.0).unwrap();
/// let mut rng = VariateRng::from_seed(42);
///
/// let accepted = sampler
///     .sample_with_bound(&mut rng, 0.2, &support, &density, 1_000)
///     .unwrap();
/// assert!(accepted.candidate >= 10.0 && accepted.candidate <= 20.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct AcceptanceRejection {
    config: SamplerConfig,
}

impl AcceptanceRejection {
    /// Creates a sampler with the given configuration.
    pub fn new(config: SamplerConfig) -> Self {
        Self { config }
    }

    /// The sampler configuration.
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Samples with a caller-supplied bound `m`.
    ///
    /// # Errors
    ///
    /// - [`SamplingError::Domain`] if `bound` is not a positive finite number
    /// - [`SamplingError::Exhausted`] if `max_trials` trials are all rejected
    /// - [`SamplingError::Cancelled`] if the configured token is triggered
    pub fn sample_with_bound<R: UniformSource>(
        &self,
        rng: &mut R,
        bound: f64,
        support: &Support,
        density: &Density,
        max_trials: usize,
    ) -> Result<Acceptance, SamplingError> {
        if !bound.is_finite() || bound <= 0.0 {
            return Err(SamplingError::domain(format!(
                "bound m = {} must be positive and finite",
                bound
            )));
        }
        self.run_trials(rng, bound, support, density, max_trials)?
            .ok_or(SamplingError::Exhausted { trials: max_trials })
    }

    /// Samples with the bound computed by [`supremum`](Self::supremum).
    ///
    /// Returns `Ok(None)` when every trial is rejected.
    ///
    /// # Errors
    ///
    /// - [`SamplingError::Domain`] if the density is unbounded or nowhere
    ///   positive on the support
    /// - [`SamplingError::Cancelled`] if the configured token is triggered
    pub fn sample_auto_bound<R: UniformSource>(
        &self,
        rng: &mut R,
        support: &Support,
        density: &Density,
        max_trials: usize,
    ) -> Result<Option<Acceptance>, SamplingError> {
        let bound = self.supremum(support, density)?;
        let accepted = self.run_trials(rng, bound, support, density, max_trials)?;
        if accepted.is_none() {
            debug!(max_trials, bound, "no candidate accepted");
        }
        Ok(accepted)
    }

    /// Estimates `max f(x)` over the support.
    ///
    /// Evaluates the density on `grid_points` equally spaced points
    /// (endpoints included). With `refine_supremum` set, every grid cell in
    /// which the derivative changes sign from positive to negative is
    /// searched for the critical point. If the derivative cannot be formed
    /// the grid maximum is used as is.
    ///
    /// # Errors
    ///
    /// [`SamplingError::Domain`] if the density is infinite somewhere on
    /// the grid or has no positive finite value.
    pub fn supremum(&self, support: &Support, density: &Density) -> Result<f64, SamplingError> {
        let n = self.config.grid_points();
        let step = support.width() / (n - 1) as f64;
        let grid_point = |i: usize| {
            if i == n - 1 {
                support.upper()
            } else {
                support.lower() + step * i as f64
            }
        };

        let mut best = f64::NEG_INFINITY;
        for i in 0..n {
            let x = grid_point(i);
            let value = density.eval(x);
            if value == f64::INFINITY {
                return Err(SamplingError::domain(format!(
                    "density {} is unbounded at {} = {}",
                    density,
                    density.variable(),
                    x
                )));
            }
            if value.is_finite() && value > best {
                best = value;
            }
        }
        let grid_max = best;

        let derivative = if self.config.refine_supremum() {
            compiled_derivative(density.expr(), density.variable())
        } else {
            None
        };
        if let Some(derivative) = derivative {
            let solver = BrentSolver::<f64>::with_defaults();
            let mut left = derivative.eval(grid_point(0));
            for i in 1..n {
                let right = derivative.eval(grid_point(i));
                if left > 0.0 && right < 0.0 {
                    let critical = solver.find_root(
                        |x| derivative.eval(x),
                        grid_point(i - 1),
                        grid_point(i),
                    );
                    if let Ok(x) = critical {
                        let value = density.eval(x);
                        if value.is_finite() && value > best {
                            best = value;
                        }
                    }
                }
                left = right;
            }
        }

        if best <= 0.0 || !best.is_finite() {
            return Err(SamplingError::domain(format!(
                "density {} has no positive value on [{}, {}]",
                density,
                support.lower(),
                support.upper()
            )));
        }

        debug!(bound = best, grid_max, grid_points = n, "supremum computed");
        Ok(best)
    }

    fn run_trials<R: UniformSource>(
        &self,
        rng: &mut R,
        bound: f64,
        support: &Support,
        density: &Density,
        max_trials: usize,
    ) -> Result<Option<Acceptance>, SamplingError> {
        let mut bound_exceeded = false;
        for trial in 1..=max_trials {
            self.config.check_cancelled(trial - 1)?;

            let u1 = rng.next_uniform();
            let u2 = rng.next_uniform();
            let x = support.point(u1);
            let fx = density.eval(x);
            trace!(trial, u1, u2, x, fx, "acceptance-rejection trial");

            if fx > bound && !bound_exceeded {
                warn!(x, fx, bound, "density exceeds the bound; samples will be biased");
                bound_exceeded = true;
            }

            if u2 <= fx / bound {
                debug!(trial, candidate = x, density = fx, u1, u2, "candidate accepted");
                return Ok(Some(Acceptance {
                    candidate: x,
                    density: fx,
                    bound,
                    trials: trial,
                    u1,
                    u2,
                }));
            }
        }
        Ok(None)
    }
}

/// [`AcceptanceRejection::sample_with_bound`] with the default configuration.
pub fn sample_with_bound<R: UniformSource>(
    rng: &mut R,
    bound: f64,
    support: &Support,
    density: &Density,
    max_trials: usize,
) -> Result<Acceptance, SamplingError> {
    AcceptanceRejection::default().sample_with_bound(rng, bound, support, density, max_trials)
}

/// [`AcceptanceRejection::sample_auto_bound`] with the default configuration.
pub fn sample_auto_bound<R: UniformSource>(
    rng: &mut R,
    support: &Support,
    density: &Density,
    max_trials: usize,
) -> Result<Option<Acceptance>, SamplingError> {
    AcceptanceRejection::default().sample_auto_bound(rng, support, density, max_trials)
}

/// `d expr / d var` ready for evaluation, or `None` when it cannot be formed.
fn compiled_derivative(expr: &Expr, var: &str) -> Option<CompiledExpr> {
    match differentiate(expr, var).and_then(|d| d.compile(var)) {
        Ok(derivative) => Some(derivative),
        Err(error) => {
            debug!(%expr, %error, "derivative unavailable, keeping grid supremum");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CancellationToken;
    use crate::rng::VariateRng;
    use approx::assert_relative_eq;

    /// Replays a fixed list of uniforms.
    struct Scripted {
        values: Vec<f64>,
        position: usize,
    }

    impl Scripted {
        fn new(values: &[f64]) -> Self {
            Self {
                values: values.to_vec(),
                position: 0,
            }
        }
    }

    impl UniformSource for Scripted {
        fn next_uniform(&mut self) -> f64 {
            let value = self.values[self.position % self.values.len()];
            self.position += 1;
            value
        }
    }

    fn triangular() -> (Density, Support) {
        (
            Density::parse("1.0/50.0 * (x - 10.0)").unwrap(),
            Support::new(10.0, 20.0).unwrap(),
        )
    }

    #[test]
    fn test_accepts_on_first_trial() {
        let (density, support) = triangular();
        // x = 10 + 10 * 0.9 = 19, f(19) = 0.18, ratio 0.9 >= 0.5
        let mut rng = Scripted::new(&[0.9, 0.5]);
        let accepted = sample_with_bound(&mut rng, 0.2, &support, &density, 10).unwrap();
        assert_relative_eq!(accepted.candidate, 19.0);
        assert_relative_eq!(accepted.density, 0.18, epsilon = 1e-12);
        assert_eq!(accepted.trials, 1);
        assert_eq!((accepted.u1, accepted.u2), (0.9, 0.5));
    }

    #[test]
    fn test_rejects_then_accepts() {
        let (density, support) = triangular();
        // Trial 1: x = 11, ratio 0.1 < 0.5 (reject); trial 2: x = 19 (accept)
        let mut rng = Scripted::new(&[0.1, 0.5, 0.9, 0.5]);
        let accepted = sample_with_bound(&mut rng, 0.2, &support, &density, 10).unwrap();
        assert_eq!(accepted.trials, 2);
        assert_relative_eq!(accepted.candidate, 19.0);
    }

    #[test]
    fn test_supplied_bound_exhaustion_is_an_error() {
        let (density, support) = triangular();
        // x = 10 always: f = 0 never beats u2 = 0.5
        let mut rng = Scripted::new(&[0.0, 0.5]);
        let err = sample_with_bound(&mut rng, 0.2, &support, &density, 25).unwrap_err();
        assert_eq!(err, SamplingError::Exhausted { trials: 25 });
    }

    #[test]
    fn test_auto_bound_exhaustion_is_none() {
        let (density, support) = triangular();
        let mut rng = Scripted::new(&[0.0, 0.5]);
        let result = sample_auto_bound(&mut rng, &support, &density, 25).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_zero_trials() {
        let (density, support) = triangular();
        let mut rng = VariateRng::from_seed(1);
        assert_eq!(
            sample_with_bound(&mut rng, 0.2, &support, &density, 0).unwrap_err(),
            SamplingError::Exhausted { trials: 0 }
        );
        assert!(sample_auto_bound(&mut rng, &support, &density, 0).unwrap().is_none());
    }

    #[test]
    fn test_invalid_bound() {
        let (density, support) = triangular();
        let mut rng = VariateRng::from_seed(1);
        for bound in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                sample_with_bound(&mut rng, bound, &support, &density, 10),
                Err(SamplingError::Domain(_))
            ));
        }
    }

    #[test]
    fn test_auto_candidate_uses_single_scaling() {
        // u1 = 0.75 must place the candidate at 17.5, not at
        // 10 + 10 * (10 + 10 * 0.75)
        let (density, support) = triangular();
        let mut rng = Scripted::new(&[0.75, 0.0]);
        let accepted = sample_auto_bound(&mut rng, &support, &density, 1)
            .unwrap()
            .unwrap();
        assert_relative_eq!(accepted.candidate, 17.5);
        assert_relative_eq!(accepted.bound, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_auto_candidates_stay_in_support() {
        let (density, support) = triangular();
        let mut rng = VariateRng::from_seed(2024);
        for _ in 0..500 {
            if let Some(accepted) = sample_auto_bound(&mut rng, &support, &density, 100).unwrap() {
                assert!(support.contains(accepted.candidate, 0.0));
            }
        }
    }

    #[test]
    fn test_supremum_on_grid() {
        let (density, support) = triangular();
        let sampler = AcceptanceRejection::default();
        assert_relative_eq!(sampler.supremum(&support, &density).unwrap(), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_supremum_refinement_finds_interior_peak() {
        // Peak of 6x(1-x) at x = 0.5 falls between the points of a 4-point grid
        let density = Density::parse("6*x*(1 - x)").unwrap();
        let support = Support::new(0.0, 1.0).unwrap();

        let coarse = AcceptanceRejection::new(
            SamplerConfig::builder()
                .grid_points(4)
                .refine_supremum(false)
                .build()
                .unwrap(),
        );
        let refined = AcceptanceRejection::new(
            SamplerConfig::builder().grid_points(4).build().unwrap(),
        );

        assert!(coarse.supremum(&support, &density).unwrap() < 1.4);
        assert_relative_eq!(
            refined.supremum(&support, &density).unwrap(),
            1.5,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_underivable_density_keeps_grid_value() {
        let bound = Expr::parse("6*x*(1 - x)").unwrap();
        assert!(compiled_derivative(&bound, "x").is_some());

        // Free parameter survives differentiation and cannot be compiled
        let free = Expr::parse("lambda*x").unwrap();
        assert!(compiled_derivative(&free, "x").is_none());
    }

    #[test]
    fn test_supremum_rejects_unbounded_density() {
        let density = Density::parse("1/x").unwrap();
        let support = Support::new(0.0, 1.0).unwrap();
        assert!(matches!(
            AcceptanceRejection::default().supremum(&support, &density),
            Err(SamplingError::Domain(_))
        ));
    }

    #[test]
    fn test_supremum_rejects_non_positive_density() {
        let density = Density::parse("-x").unwrap();
        let support = Support::new(0.0, 1.0).unwrap();
        let mut rng = VariateRng::from_seed(1);
        assert!(matches!(
            sample_auto_bound(&mut rng, &support, &density, 10),
            Err(SamplingError::Domain(_))
        ));
    }

    #[test]
    fn test_cancellation() {
        let (density, support) = triangular();
        let token = CancellationToken::new();
        token.cancel();
        let sampler =
            AcceptanceRejection::new(SamplerConfig::builder().cancellation(token).build().unwrap());
        let mut rng = VariateRng::from_seed(3);
        assert_eq!(
            sampler
                .sample_with_bound(&mut rng, 0.2, &support, &density, 10)
                .unwrap_err(),
            SamplingError::Cancelled { trials: 0 }
        );
    }
}
