//! Core error types.
//!
//! This module provides:
//! - `error`: Structured error types for symbolic and solver operations
//!
//! # Re-exports
//!
//! [`SymbolicError`] and [`SolverError`] are re-exported at this module level.

pub mod error;

pub use error::{SolverError, SymbolicError};
