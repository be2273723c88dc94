//! Closed-form equation solving.
//!
//! [`solve`] rewrites `lhs = rhs` as `lhs - rhs = 0` and tries, in order:
//!
//! 1. polynomial equations of degree 1 or 2, and pure `c*x^n + d` forms;
//! 2. isolation, when the variable occurs exactly once, by peeling
//!    invertible operations off the left-hand side.
//!
//! Every solution is tagged with how it was produced. Steps that introduce
//! more than one preimage (even powers, `abs`, quadratics) produce one
//! solution per branch; periodic functions contribute their principal
//! branch only.

use std::fmt;

use super::expr::{Expr, Func};
use super::polynomial;
use crate::types::SymbolicError;

/// Origin of a solution branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BranchKind {
    /// Unique solution of a linear equation.
    Linear,
    /// Quadratic formula with `+sqrt(discriminant)`.
    QuadraticPlus,
    /// Quadratic formula with `-sqrt(discriminant)`.
    QuadraticMinus,
    /// Non-negative root of an even power or `abs`.
    PositiveRoot,
    /// Negated root of an even power or `abs`.
    NegativeRoot,
    /// Result of isolating a single occurrence through invertible steps.
    Principal,
}

impl fmt::Display for BranchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BranchKind::Linear => "linear",
            BranchKind::QuadraticPlus => "quadratic(+)",
            BranchKind::QuadraticMinus => "quadratic(-)",
            BranchKind::PositiveRoot => "root(+)",
            BranchKind::NegativeRoot => "root(-)",
            BranchKind::Principal => "principal",
        };
        f.write_str(label)
    }
}

/// One algebraic solution of an equation.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Closed-form expression for the variable.
    pub expr: Expr,
    /// How the branch was obtained.
    pub kind: BranchKind,
}

/// Solves `lhs = rhs` for `var`.
///
/// # Errors
///
/// [`SymbolicError::NoClosedForm`] when the variable cancels out or no
/// strategy applies, e.g. `x + exp(x) = r`.
///
/// ```
/// use variate_core::symbolic::{solve, BranchKind, Expr};
///
/// let cdf = Expr::parse("(x - 2)/3").unwrap();
/// let solutions = solve(&cdf, &Expr::sym("r"), "x").unwrap();
/// assert_eq!(solutions.len(), 1);
/// assert_eq!(solutions[0].kind, BranchKind::Linear);
/// assert!((solutions[0].expr.eval_at("r", 0.5).unwrap() - 3.5).abs() < 1e-12);
/// ```
pub fn solve(lhs: &Expr, rhs: &Expr, var: &str) -> Result<Vec<Solution>, SymbolicError> {
    let equation = (lhs.clone() - rhs.clone()).simplify();
    let no_closed_form = || SymbolicError::NoClosedForm {
        variable: var.to_string(),
        equation: equation.to_string(),
    };

    if !equation.contains(var) {
        return Err(no_closed_form());
    }

    let mut solutions = match polynomial::collect(&equation, var) {
        Some(coeffs) => solve_polynomial(&coeffs),
        None => None,
    };

    if solutions.is_none() && equation.occurrences(var) == 1 {
        solutions = Some(isolate(&equation, Expr::Num(0.0), var, BranchKind::Principal));
    }

    let mut solutions = solutions.ok_or_else(no_closed_form)?;
    if solutions.is_empty() {
        return Err(no_closed_form());
    }

    for solution in &mut solutions {
        solution.expr = solution.expr.simplify();
    }
    solutions.dedup_by(|a, b| a.expr == b.expr);
    Ok(solutions)
}

fn solve_polynomial(coeffs: &[Expr]) -> Option<Vec<Solution>> {
    let two = Expr::Num(2.0);
    match polynomial::degree(coeffs) {
        1 => Some(vec![Solution {
            expr: -(coeffs[0].clone()) / coeffs[1].clone(),
            kind: BranchKind::Linear,
        }]),
        2 if coeffs[1].is_zero() => {
            let root = (-(coeffs[0].clone()) / coeffs[2].clone()).call(Func::Sqrt);
            Some(vec![
                Solution {
                    expr: root.clone(),
                    kind: BranchKind::PositiveRoot,
                },
                Solution {
                    expr: -root,
                    kind: BranchKind::NegativeRoot,
                },
            ])
        }
        2 => {
            let (c, b, a) = (coeffs[0].clone(), coeffs[1].clone(), coeffs[2].clone());
            let discriminant =
                b.clone().pow(two.clone()) - Expr::Num(4.0) * a.clone() * c;
            let sqrt_disc = discriminant.call(Func::Sqrt);
            let denominator = two * a;
            Some(vec![
                Solution {
                    expr: (-b.clone() + sqrt_disc.clone()) / denominator.clone(),
                    kind: BranchKind::QuadraticPlus,
                },
                Solution {
                    expr: (-b - sqrt_disc) / denominator,
                    kind: BranchKind::QuadraticMinus,
                },
            ])
        }
        n if n > 2 && coeffs[1..n].iter().all(Expr::is_zero) => {
            let base = -(coeffs[0].clone()) / coeffs[n].clone();
            let root = real_root(base, Expr::Num(n as f64));
            if n % 2 == 0 {
                Some(vec![
                    Solution {
                        expr: root.clone(),
                        kind: BranchKind::PositiveRoot,
                    },
                    Solution {
                        expr: -root,
                        kind: BranchKind::NegativeRoot,
                    },
                ])
            } else {
                Some(vec![Solution {
                    expr: root,
                    kind: BranchKind::Principal,
                }])
            }
        }
        _ => None,
    }
}

/// `degree`-th root of `radicand`, real for odd degrees.
fn real_root(radicand: Expr, degree: Expr) -> Expr {
    match degree.as_num() {
        Some(n) if n == 3.0 => radicand.call(Func::Cbrt),
        _ => radicand.pow(Expr::Num(1.0) / degree),
    }
}

/// Peels operations off `lhs` (which contains `var` exactly once) until the
/// variable stands alone, applying the inverse operations to `rhs`.
fn isolate(lhs: &Expr, rhs: Expr, var: &str, kind: BranchKind) -> Vec<Solution> {
    let split = |u: &Expr, root: Expr| {
        let mut out = isolate(u, root.clone(), var, BranchKind::PositiveRoot);
        out.extend(isolate(u, -root, var, BranchKind::NegativeRoot));
        out
    };

    match lhs {
        Expr::Sym(name) if name == var => vec![Solution { expr: rhs, kind }],
        Expr::Neg(u) => isolate(u, -rhs, var, kind),
        Expr::Add(u, v) if u.contains(var) => isolate(u, rhs - (**v).clone(), var, kind),
        Expr::Add(u, v) => isolate(v, rhs - (**u).clone(), var, kind),
        Expr::Sub(u, v) if u.contains(var) => isolate(u, rhs + (**v).clone(), var, kind),
        Expr::Sub(u, v) => isolate(v, (**u).clone() - rhs, var, kind),
        Expr::Mul(u, v) if u.contains(var) => isolate(u, rhs / (**v).clone(), var, kind),
        Expr::Mul(u, v) => isolate(v, rhs / (**u).clone(), var, kind),
        Expr::Div(u, v) if u.contains(var) => isolate(u, rhs * (**v).clone(), var, kind),
        Expr::Div(u, v) => isolate(v, (**u).clone() / rhs, var, kind),
        Expr::Pow(u, n) if u.contains(var) => {
            let n = (**n).clone().simplify();
            let root = real_root(rhs, n.clone());
            let even = n
                .as_num()
                .is_some_and(|v| v.fract() == 0.0 && (v as i64) % 2 == 0);
            if even {
                split(u, root)
            } else {
                isolate(u, root, var, kind)
            }
        }
        Expr::Pow(k, u) => isolate(
            u,
            rhs.call(Func::Ln) / (**k).clone().call(Func::Ln),
            var,
            kind,
        ),
        Expr::Call(func, u) => match func {
            Func::Exp => isolate(u, rhs.call(Func::Ln), var, kind),
            Func::Ln => isolate(u, rhs.call(Func::Exp), var, kind),
            Func::Sqrt => isolate(u, rhs.pow(Expr::Num(2.0)), var, kind),
            Func::Cbrt => isolate(u, rhs.pow(Expr::Num(3.0)), var, kind),
            Func::Sin => isolate(u, rhs.call(Func::Asin), var, kind),
            Func::Cos => isolate(u, rhs.call(Func::Acos), var, kind),
            Func::Tan => isolate(u, rhs.call(Func::Atan), var, kind),
            Func::Asin => isolate(u, rhs.call(Func::Sin), var, kind),
            Func::Acos => isolate(u, rhs.call(Func::Cos), var, kind),
            Func::Atan => isolate(u, rhs.call(Func::Tan), var, kind),
            Func::Abs => split(u, rhs),
        },
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn r() -> Expr {
        Expr::sym("r")
    }

    fn solve_text(lhs: &str) -> Result<Vec<Solution>, SymbolicError> {
        solve(&Expr::parse(lhs).unwrap(), &r(), "x")
    }

    #[test]
    fn test_linear_cdf() {
        let solutions = solve_text("x/3 - 2/3").unwrap();
        assert_eq!(solutions.len(), 1);
        for level in [0.0, 0.25, 1.0] {
            assert_relative_eq!(
                solutions[0].expr.eval_at("r", level).unwrap(),
                2.0 + 3.0 * level,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_pure_quadratic_gives_two_roots() {
        let solutions = solve_text("x^2").unwrap();
        assert_eq!(solutions.len(), 2);
        assert_eq!(solutions[0].kind, BranchKind::PositiveRoot);
        assert_eq!(solutions[1].kind, BranchKind::NegativeRoot);
        assert_relative_eq!(solutions[0].expr.eval_at("r", 0.25).unwrap(), 0.5);
        assert_relative_eq!(solutions[1].expr.eval_at("r", 0.25).unwrap(), -0.5);
    }

    #[test]
    fn test_full_quadratic() {
        // CDF of f(x) = (x + 1)/2 on [-1, 1]: (x + 1)^2 / 4
        let solutions = solve_text("x^2/4 + x/2 + 1/4").unwrap();
        assert_eq!(solutions.len(), 2);
        let plus = &solutions[0];
        assert_eq!(plus.kind, BranchKind::QuadraticPlus);
        // x = 2 sqrt(r) - 1
        assert_relative_eq!(plus.expr.eval_at("r", 0.25).unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(plus.expr.eval_at("r", 1.0).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cubic_monomial() {
        let solutions = solve_text("x^3").unwrap();
        assert_eq!(solutions.len(), 1);
        assert_relative_eq!(solutions[0].expr.eval_at("r", 0.125).unwrap(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_odd_roots_keep_negative_radicands_real() {
        // CDF of 1.5 x^2 on [-1, 1]: (x^3 + 1)/2
        let solutions = solve_text("x^3/2 + 1/2").unwrap();
        assert_eq!(solutions.len(), 1);
        let q = solutions[0].expr.compile("r").unwrap();
        assert_relative_eq!(q.eval(0.0625), -(0.875_f64.cbrt()), epsilon = 1e-12);
        assert_relative_eq!(q.eval(0.5), 0.0, epsilon = 1e-12);

        // Odd power reached through isolation
        let fifth = solve_text("(x - 1)^5").unwrap();
        assert_relative_eq!(fifth[0].expr.eval_at("r", -32.0).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_exponential_cdf_isolation() {
        // CDF of exponential(2): 1 - exp(-2x)
        let solutions = solve_text("1 - exp(-2*x)").unwrap();
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].kind, BranchKind::Principal);
        let expected = -(0.5_f64).ln() / 2.0;
        assert_relative_eq!(solutions[0].expr.eval_at("r", 0.5).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_trigonometric_principal_branch() {
        // CDF of sin(x)/2 on [0, pi]: (1 - cos(x))/2
        let solutions = solve_text("(1 - cos(x))/2").unwrap();
        assert_eq!(solutions.len(), 1);
        assert_relative_eq!(
            solutions[0].expr.eval_at("r", 0.5).unwrap(),
            std::f64::consts::FRAC_PI_2,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_even_power_isolation_splits() {
        let solutions = solve_text("(x - 1)^4 / 2").unwrap();
        // Collected as a full quartic: handled by isolation instead
        assert_eq!(solutions.len(), 2);
        assert_relative_eq!(solutions[0].expr.eval_at("r", 0.5).unwrap(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(solutions[1].expr.eval_at("r", 0.5).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_transcendental_has_no_closed_form() {
        let err = solve_text("x + exp(x)").unwrap_err();
        assert!(matches!(err, SymbolicError::NoClosedForm { .. }));
    }

    #[test]
    fn test_general_quartic_has_no_closed_form() {
        assert!(solve_text("x^4 + x").is_err());
    }

    #[test]
    fn test_variable_absent() {
        let err = solve(&Expr::num(1.0), &r(), "x").unwrap_err();
        assert!(matches!(err, SymbolicError::NoClosedForm { .. }));
    }
}
