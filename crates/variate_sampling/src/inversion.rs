//! # Symbolic Inversion
//!
//! Turns a density into its cumulative distribution function and solves
//! `F(x) = r` for `x`, giving the quantile function(s) used by
//! inverse-transform sampling.
//!
//! With a lower limit `a` the CDF is the definite integral
//! `F(x) - F(a)`; without one it is the bare antiderivative. The solver can
//! return several algebraic branches (a quadratic CDF has two); they are
//! kept apart and tagged, and [`DensityInversion::select_branch`] picks the
//! one that maps `(0, 1)` monotonically into the support.

use tracing::debug;
use variate_core::symbolic::{integrate, solve, BranchKind, CompiledExpr, Expr};

use crate::density::{Density, Support};
use crate::error::SamplingError;

/// Levels in `(0, 1)` at which candidate branches are checked.
const VALIDATION_LEVELS: usize = 99;

/// One closed-form solution of `F(x) = r`.
#[derive(Clone, Debug)]
pub struct InverseBranch {
    expr: Expr,
    kind: BranchKind,
    compiled: CompiledExpr,
}

impl InverseBranch {
    fn new(expr: Expr, kind: BranchKind, level: &str) -> Result<Self, SamplingError> {
        let compiled = expr.compile(level)?;
        Ok(Self {
            expr,
            kind,
            compiled,
        })
    }

    /// The symbolic quantile function.
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// How the branch was produced.
    pub fn kind(&self) -> BranchKind {
        self.kind
    }

    /// Evaluates the branch at level `r`.
    #[inline]
    pub fn eval(&self, r: f64) -> f64 {
        self.compiled.eval(r)
    }

    /// Checks that the branch is finite, inside `support` and
    /// non-decreasing over a grid of levels in `(0, 1)`.
    pub fn is_valid_on(&self, support: &Support) -> bool {
        let tolerance = 1e-9 * support.width().max(1.0);
        let mut previous = f64::NEG_INFINITY;
        for k in 0..VALIDATION_LEVELS {
            let r = (k as f64 + 1.0) / (VALIDATION_LEVELS as f64 + 1.0);
            let x = self.eval(r);
            if !x.is_finite() || !support.contains(x, tolerance) || x < previous - tolerance {
                return false;
            }
            previous = x;
        }
        true
    }
}

/// Inverse of a cumulative distribution function.
#[derive(Clone, Debug)]
pub enum Inverse {
    /// The equation has exactly one solution.
    Unique(InverseBranch),
    /// Several algebraic branches, in solver order.
    Branches(Vec<InverseBranch>),
}

/// Result of [`invert_density`].
///
/// # Examples
///
/// ```rust
/// use variate_sampling::{invert_density, Density, Support};
///
/// let density = Density::parse("2*x").unwrap();
/// let inversion = invert_density(&density, Some(0.0)).unwrap();
///
/// // x^2 = r has two roots; only +sqrt(r) stays in [0, 1]
/// assert_eq!(inversion.branches().len(), 2);
/// let quantile = inversion.select_branch(&Support::new(0.0, 1.0).unwrap()).unwrap();
/// assert!((quantile.eval(0.25) - 0.5).abs() < 1e-12);
/// ```
#[derive(Clone, Debug)]
pub struct DensityInversion {
    density: Density,
    level: String,
    cdf: Expr,
    inverse: Inverse,
}

impl DensityInversion {
    /// The density that was inverted.
    pub fn density(&self) -> &Density {
        &self.density
    }

    /// Variable of the density (and of the CDF).
    pub fn variable(&self) -> &str {
        self.density.variable()
    }

    /// Symbol standing for the uniform level in the inverse, normally `r`.
    pub fn level(&self) -> &str {
        &self.level
    }

    /// The cumulative form.
    pub fn cdf(&self) -> &Expr {
        &self.cdf
    }

    /// The solved inverse.
    pub fn inverse(&self) -> &Inverse {
        &self.inverse
    }

    /// All branches, in solver order.
    pub fn branches(&self) -> &[InverseBranch] {
        match &self.inverse {
            Inverse::Unique(branch) => std::slice::from_ref(branch),
            Inverse::Branches(branches) => branches,
        }
    }

    /// Returns the inverse when it is unique.
    ///
    /// # Errors
    ///
    /// [`SamplingError::AmbiguousInverse`] when there are several branches.
    pub fn unique(&self) -> Result<&InverseBranch, SamplingError> {
        match &self.inverse {
            Inverse::Unique(branch) => Ok(branch),
            Inverse::Branches(branches) => Err(SamplingError::AmbiguousInverse {
                branches: branches.len(),
            }),
        }
    }

    /// Picks the only branch that is a valid quantile function on `support`.
    ///
    /// # Errors
    ///
    /// - [`SamplingError::AmbiguousInverse`] if several branches qualify
    /// - [`SamplingError::Inversion`] if none does
    pub fn select_branch(&self, support: &Support) -> Result<&InverseBranch, SamplingError> {
        let valid: Vec<&InverseBranch> = self
            .branches()
            .iter()
            .filter(|branch| branch.is_valid_on(support))
            .collect();

        match valid.as_slice() {
            [branch] => {
                debug!(kind = %branch.kind, inverse = %branch.expr, "inverse branch selected");
                Ok(branch)
            }
            [] => Err(SamplingError::Inversion(format!(
                "no inverse branch maps (0, 1) into [{}, {}]",
                support.lower(),
                support.upper()
            ))),
            several => Err(SamplingError::AmbiguousInverse {
                branches: several.len(),
            }),
        }
    }
}

/// Integrates `density` and solves `CDF(x) = r` for `x`.
///
/// # Errors
///
/// - [`SamplingError::Inversion`] if the integral or the inverse has no
///   closed form
/// - [`SamplingError::Domain`] if `lower_limit` is not finite or the
///   antiderivative is undefined there
pub fn invert_density(
    density: &Density,
    lower_limit: Option<f64>,
) -> Result<DensityInversion, SamplingError> {
    let variable = density.variable();
    let antiderivative = integrate(density.expr(), variable)?;

    let cdf = match lower_limit {
        Some(lower) => {
            if !lower.is_finite() {
                return Err(SamplingError::domain(format!(
                    "lower limit {} must be finite",
                    lower
                )));
            }
            let offset = antiderivative.eval_at(variable, lower)?;
            if !offset.is_finite() {
                return Err(SamplingError::domain(format!(
                    "antiderivative {} is undefined at {} = {}",
                    antiderivative, variable, lower
                )));
            }
            (antiderivative - Expr::num(offset)).simplify()
        }
        None => antiderivative,
    };

    let level = if variable == "r" { "u" } else { "r" };
    let mut branches = solve(&cdf, &Expr::sym(level), variable)?
        .into_iter()
        .map(|solution| InverseBranch::new(solution.expr, solution.kind, level))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        density = %density,
        cdf = %cdf,
        branches = branches.len(),
        "density inverted"
    );

    let inverse = if branches.len() == 1 {
        Inverse::Unique(branches.remove(0))
    } else {
        Inverse::Branches(branches)
    };

    Ok(DensityInversion {
        density: density.clone(),
        level: level.to_string(),
        cdf,
        inverse,
    })
}
