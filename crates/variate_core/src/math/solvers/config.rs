//! Stopping rules for the bracketing solver.

use num_traits::Float;

use crate::types::SolverError;

/// Stopping rules for [`BrentSolver`](super::BrentSolver).
///
/// The bracket is considered converged once its half-width drops below
/// `2 * eps * |x| + x_tolerance / 2`, so `x_tolerance` is an absolute
/// floor and machine precision takes over for large abscissae.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig<T: Float> {
    /// Absolute tolerance on the root's location.
    pub x_tolerance: T,
    /// Iteration budget.
    pub max_iterations: usize,
}

impl<T: Float> Default for SolverConfig<T> {
    /// `x_tolerance = 1e-12`, 100 iterations.
    fn default() -> Self {
        Self {
            x_tolerance: T::from(1e-12).unwrap_or_else(T::epsilon),
            max_iterations: 100,
        }
    }
}

impl<T: Float> SolverConfig<T> {
    /// Checked constructor.
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidConfig`] if the tolerance is not positive and
    /// finite or the iteration budget is zero.
    pub fn new(x_tolerance: T, max_iterations: usize) -> Result<Self, SolverError> {
        if !(x_tolerance > T::zero() && x_tolerance.is_finite()) {
            return Err(SolverError::InvalidConfig(
                "x_tolerance must be positive and finite".to_string(),
            ));
        }
        if max_iterations == 0 {
            return Err(SolverError::InvalidConfig(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            x_tolerance,
            max_iterations,
        })
    }
}
