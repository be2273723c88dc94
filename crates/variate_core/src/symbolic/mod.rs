//! # Symbolic Expression Engine
//!
//! A small computer-algebra layer for single-variable densities and their
//! cumulative distribution functions.
//!
//! ## Capabilities
//!
//! - [`Expr::parse`]: text to expression tree
//! - [`Expr::simplify`]: constant folding and algebraic identities
//! - [`differentiate`] and [`integrate`]: calculus over the supported forms
//! - [`solve`]: closed-form equation solving with tagged branches
//! - [`Expr::eval`] / [`Expr::compile`]: numeric evaluation
//!
//! ## Module Structure
//!
//! - [`expr`]: Expression tree, functions, rendering
//! - [`parser`]: Tokeniser and recursive-descent parser
//! - [`polynomial`]: Polynomial coefficient collection
//! - `calculus`: Differentiation and integration
//! - `solve`: Equation solving
//! - `compile`: Postfix compilation for repeated evaluation
//!
//! ## Usage Example
//!
//! ```rust
//! use variate_core::symbolic::{integrate, solve, Expr};
//!
//! let density = Expr::parse("2*exp(-2*x)").unwrap();
//! let antiderivative = integrate(&density, "x").unwrap();
//! // CDF on [0, inf): F(x) - F(0)
//! let f0 = antiderivative.eval_at("x", 0.0).unwrap();
//! let cdf = (antiderivative - Expr::num(f0)).simplify();
//!
//! let inverse = solve(&cdf, &Expr::sym("r"), "x").unwrap();
//! let q = inverse[0].expr.compile("r").unwrap();
//! assert!((q.eval(0.5) - 2.0_f64.ln() / 2.0).abs() < 1e-12);
//! ```

mod calculus;
mod compile;
pub mod expr;
pub mod parser;
pub mod polynomial;
mod simplify;
mod solve;

pub use calculus::{differentiate, integrate};
pub use compile::CompiledExpr;
pub use expr::{Expr, Func};
pub use solve::{solve, BranchKind, Solution};
