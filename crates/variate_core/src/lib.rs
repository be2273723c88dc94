//! # variate_core: Symbolic and Numerical Foundation for Variate Generation
//!
//! ## Layer 1 (Foundation) Role
//!
//! variate_core serves as the bottom layer of the workspace, providing:
//! - A single-variable symbolic expression engine (`symbolic`): parsing,
//!   simplification, differentiation, integration, equation solving and
//!   compiled numeric evaluation
//! - Root-finding solvers (`math::solvers`)
//! - Error types: `SymbolicError`, `SolverError` (`types::error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other variate_* crates, with minimal external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use variate_core::symbolic::{integrate, solve, Expr};
//!
//! // Density of a triangular distribution on [0, 1]
//! let density = Expr::parse("2*x").unwrap();
//! let cdf = integrate(&density, "x").unwrap();
//! assert!((cdf.eval_at("x", 0.5).unwrap() - 0.25).abs() < 1e-12);
//!
//! // Solve CDF(x) = r for x
//! let branches = solve(&cdf, &Expr::sym("r"), "x").unwrap();
//! assert_eq!(branches.len(), 2);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for error types

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod symbolic;
pub mod types;

pub use types::{SolverError, SymbolicError};
