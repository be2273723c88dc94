//! Root finding for density critical points.
//!
//! [`BrentSolver`] is a derivative-free bracketing method; [`SolverConfig`]
//! holds its stopping rules.
//!
//! ```
//! use variate_core::math::solvers::{BrentSolver, SolverConfig};
//!
//! let solver = BrentSolver::new(SolverConfig::new(1e-10, 60).unwrap());
//! let root = solver.find_root(|x: f64| 6.0 - 12.0 * x, 0.0, 1.0).unwrap();
//! assert!((root - 0.5).abs() < 1e-10);
//! ```

mod brent;
mod config;

pub use brent::BrentSolver;
pub use config::SolverConfig;
