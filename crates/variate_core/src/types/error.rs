//! Error types for structured error handling.
//!
//! This module provides:
//! - `SymbolicError`: Errors from parsing, manipulating and evaluating expressions
//! - `SolverError`: Errors from root-finding solvers

use thiserror::Error;

/// Symbolic algebra errors.
///
/// Provides structured error handling for the expression engine with
/// descriptive context for each failure mode.
///
/// # Variants
/// - `Parse`: Malformed expression text
/// - `UnboundSymbol`: A symbol has no value during evaluation or compilation
/// - `Unsupported`: The operation has no rule for the given expression form
/// - `NoClosedForm`: An equation has no algebraic solution reachable by the solver
/// - `Evaluation`: Numeric evaluation produced an undefined value
///
/// # Examples
/// ```
/// use variate_core::types::SymbolicError;
///
/// let err = SymbolicError::UnboundSymbol("lambda".to_string());
/// assert_eq!(format!("{}", err), "Unbound symbol: lambda");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SymbolicError {
    /// Expression text could not be parsed.
    #[error("Parse error at position {position}: {message}")]
    Parse {
        /// Byte offset of the offending token
        position: usize,
        /// Description of the problem
        message: String,
    },

    /// A symbol has no binding.
    #[error("Unbound symbol: {0}")]
    UnboundSymbol(String),

    /// No rule applies to the expression.
    #[error("Unsupported {operation}: {expression}")]
    Unsupported {
        /// Operation that was attempted (e.g. "integration")
        operation: &'static str,
        /// Rendered expression that could not be handled
        expression: String,
    },

    /// The equation cannot be solved in closed form.
    #[error("No closed-form solution for {variable} in {equation} = 0")]
    NoClosedForm {
        /// Variable being solved for
        variable: String,
        /// Rendered left-hand side of the normalised equation
        equation: String,
    },

    /// Numeric evaluation failed.
    #[error("Evaluation error: {0}")]
    Evaluation(String),
}

/// Solver-specific errors.
///
/// # Examples
/// ```
/// use variate_core::types::SolverError;
///
/// let err = SolverError::MaxIterationsExceeded { iterations: 100 };
/// assert!(format!("{}", err).contains("100 iterations"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverError {
    /// Solver failed to converge within maximum iterations.
    #[error("Failed to converge after {iterations} iterations")]
    MaxIterationsExceeded {
        /// Number of iterations attempted
        iterations: usize,
    },

    /// No valid bracket (function values at endpoints have same sign).
    #[error("No bracket: f({a}) and f({b}) have same sign")]
    NoBracket {
        /// Left bracket endpoint
        a: f64,
        /// Right bracket endpoint
        b: f64,
    },

    /// Stopping rules are unusable.
    #[error("Invalid solver configuration: {0}")]
    InvalidConfig(String),
}
