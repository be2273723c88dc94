//! Brent's bracketing root finder.

use num_traits::Float;

use super::SolverConfig;
use crate::types::SolverError;

/// Bracketing root finder mixing bisection, secant and inverse quadratic
/// interpolation.
///
/// Each step keeps a sign change inside the bracket, so convergence is
/// guaranteed for a continuous function; interpolation is accepted only
/// while it shrinks the bracket faster than bisection would.
///
/// Acceptance-rejection uses it on a density's derivative, inside grid
/// cells where the derivative changes sign, to find the interior maxima.
///
/// ```
/// use variate_core::math::solvers::BrentSolver;
///
/// // f'(x) for f(x) = 12 x^2 (1 - x) vanishes at x = 2/3
/// let solver = BrentSolver::with_defaults();
/// let mode = solver.find_root(|x: f64| 24.0 * x - 36.0 * x * x, 0.5, 1.0).unwrap();
/// assert!((mode - 2.0 / 3.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct BrentSolver<T: Float> {
    config: SolverConfig<T>,
}

/// Working state: `b` is the best estimate, `[b, c]` brackets the root
/// and `a` is the previous estimate.
struct Bracket<T> {
    a: T,
    fa: T,
    b: T,
    fb: T,
    c: T,
    fc: T,
    step: T,
    previous_step: T,
}

impl<T: Float> Bracket<T> {
    fn new(a: T, fa: T, b: T, fb: T) -> Self {
        Self {
            a,
            fa,
            b,
            fb,
            c: b,
            fc: fb,
            step: b - a,
            previous_step: b - a,
        }
    }

    /// Re-establishes the sign change and moves the smaller residual to `b`.
    fn normalise(&mut self) {
        if self.fb.signum() == self.fc.signum() && self.fb != T::zero() {
            self.c = self.a;
            self.fc = self.fa;
            self.step = self.b - self.a;
            self.previous_step = self.step;
        }
        if self.fc.abs() < self.fb.abs() {
            self.a = self.b;
            self.b = self.c;
            self.c = self.a;
            self.fa = self.fb;
            self.fb = self.fc;
            self.fc = self.fa;
        }
    }

    /// Proposed interpolation step as `p / q`, if any.
    fn interpolate(&self) -> Option<(T, T)> {
        let one = T::one();
        let s = self.fb / self.fa;
        let (mut p, mut q) = if self.a == self.c {
            let half = (self.c - self.b) / (one + one);
            ((one + one) * half * s, one - s)
        } else {
            let q = self.fa / self.fc;
            let r = self.fb / self.fc;
            let half = (self.c - self.b) / (one + one);
            (
                s * ((one + one) * half * q * (q - r) - (self.b - self.a) * (r - one)),
                (q - one) * (r - one) * (s - one),
            )
        };
        if p > T::zero() {
            q = -q;
        }
        p = p.abs();
        (q != T::zero()).then_some((p, q))
    }
}

impl<T: Float> BrentSolver<T> {
    /// Solver with explicit stopping rules.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Solver with [`SolverConfig::default`].
    pub fn with_defaults() -> Self {
        Self::new(SolverConfig::default())
    }

    /// Stopping rules in use.
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }

    /// Finds `x` in `[lo, hi]` (either order) with `f(x) = 0`.
    ///
    /// # Errors
    ///
    /// - [`SolverError::NoBracket`] if `f(lo)` and `f(hi)` are non-zero and
    ///   share a sign, or either is NaN
    /// - [`SolverError::MaxIterationsExceeded`] if the budget runs out
    pub fn find_root<F>(&self, f: F, lo: T, hi: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        let (flo, fhi) = (f(lo), f(hi));
        if flo == T::zero() {
            return Ok(lo);
        }
        if fhi == T::zero() {
            return Ok(hi);
        }
        if flo.is_nan() || fhi.is_nan() || flo.signum() == fhi.signum() {
            return Err(SolverError::NoBracket {
                a: lo.to_f64().unwrap_or(f64::NAN),
                b: hi.to_f64().unwrap_or(f64::NAN),
            });
        }

        let one = T::one();
        let two = one + one;
        let three = two + one;
        let mut bracket = Bracket::new(lo, flo, hi, fhi);

        for _ in 0..self.config.max_iterations {
            bracket.normalise();

            let tol = two * T::epsilon() * bracket.b.abs() + self.config.x_tolerance / two;
            let half = (bracket.c - bracket.b) / two;
            if half.abs() <= tol || bracket.fb == T::zero() {
                return Ok(bracket.b);
            }

            let interpolated = if bracket.previous_step.abs() >= tol
                && bracket.fa.abs() > bracket.fb.abs()
            {
                bracket.interpolate().filter(|&(p, q)| {
                    let limit = (three * half * q).abs() - (tol * q).abs();
                    two * p < limit.min((bracket.previous_step * q).abs())
                })
            } else {
                None
            };

            match interpolated {
                Some((p, q)) => {
                    bracket.previous_step = bracket.step;
                    bracket.step = p / q;
                }
                None => {
                    bracket.step = half;
                    bracket.previous_step = half;
                }
            }

            bracket.a = bracket.b;
            bracket.fa = bracket.fb;
            bracket.b = if bracket.step.abs() > tol {
                bracket.b + bracket.step
            } else {
                bracket.b + tol * half.signum()
            };
            bracket.fb = f(bracket.b);
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
        })
    }
}
