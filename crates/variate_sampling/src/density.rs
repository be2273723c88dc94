//! Densities and supports.
//!
//! A [`Density`] is a symbolic expression in at most one free variable,
//! compiled once for the repeated evaluation done by the samplers. A
//! [`Support`] is the finite interval `[a, b]` a density is sampled on.

use std::fmt;

use variate_core::symbolic::{CompiledExpr, Expr};

use crate::error::SamplingError;

/// Variable assumed when a density has no free symbol.
pub const DEFAULT_VARIABLE: &str = "x";

/// Finite sampling interval `[a, b]` with `a < b`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Support {
    lower: f64,
    upper: f64,
}

impl Support {
    /// Creates the interval `[lower, upper]`.
    ///
    /// # Errors
    ///
    /// [`SamplingError::Domain`] unless both ends are finite and
    /// `lower < upper`.
    pub fn new(lower: f64, upper: f64) -> Result<Self, SamplingError> {
        if !lower.is_finite() || !upper.is_finite() {
            return Err(SamplingError::domain(format!(
                "support [{}, {}] must be finite",
                lower, upper
            )));
        }
        if lower >= upper {
            return Err(SamplingError::domain(format!(
                "support [{}, {}] requires a < b",
                lower, upper
            )));
        }
        Ok(Self { lower, upper })
    }

    /// Left end `a`.
    #[inline]
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Right end `b`.
    #[inline]
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Length `b - a`.
    #[inline]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Maps `u` in `[0, 1]` affinely onto the interval: `a + (b - a) * u`.
    #[inline]
    pub fn point(&self, u: f64) -> f64 {
        self.lower + self.width() * u
    }

    /// Returns `true` if `x` lies in `[a, b]`, widened by `tolerance`.
    #[inline]
    pub fn contains(&self, x: f64, tolerance: f64) -> bool {
        x >= self.lower - tolerance && x <= self.upper + tolerance
    }
}

/// A probability density function in one variable.
///
/// # Examples
///
/// ```rust
/// use variate_sampling::Density;
///
/// let density = Density::parse("1.0/50.0 * (x - 10.0)").unwrap();
/// assert_eq!(density.variable(), "x");
/// assert!((density.eval(20.0) - 0.2).abs() < 1e-12);
/// ```
#[derive(Clone, Debug)]
pub struct Density {
    expr: Expr,
    variable: String,
    compiled: CompiledExpr,
}

impl Density {
    /// Parses density text.
    ///
    /// # Errors
    ///
    /// [`SamplingError::Domain`] for malformed text or more than one free
    /// variable.
    pub fn parse(text: &str) -> Result<Self, SamplingError> {
        Self::from_expr(Expr::parse(text)?)
    }

    /// Wraps an expression, inferring its variable.
    ///
    /// A constant expression is taken as a function of `x`.
    ///
    /// # Errors
    ///
    /// [`SamplingError::Domain`] if the expression has more than one free
    /// variable.
    pub fn from_expr(expr: Expr) -> Result<Self, SamplingError> {
        let symbols = expr.free_symbols();
        let variable = match symbols.len() {
            0 => DEFAULT_VARIABLE.to_string(),
            1 => symbols.into_iter().next().unwrap_or_default(),
            _ => {
                let names: Vec<_> = symbols.into_iter().collect();
                return Err(SamplingError::domain(format!(
                    "density must have one free variable, found {}",
                    names.join(", ")
                )));
            }
        };
        let compiled = expr.compile(&variable)?;
        Ok(Self {
            expr,
            variable,
            compiled,
        })
    }

    /// The symbolic form.
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Name of the free variable.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Evaluates the density at `x`.
    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        self.compiled.eval(x)
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}
