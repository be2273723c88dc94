//! Polynomial view of an expression.
//!
//! [`collect`] rewrites an expression as `c0 + c1*x + ... + cn*x^n` where
//! every coefficient is an expression free of `x` (it may mention other
//! symbols such as a probability level `r`). Expressions that are not
//! polynomial in `x` yield `None`.

use super::expr::Expr;

/// Highest degree produced by expanding integer powers.
pub const MAX_DEGREE: usize = 16;

/// Coefficients in ascending degree order.
pub type Coefficients = Vec<Expr>;

/// Collects `expr` as a polynomial in `var`.
///
/// Trailing zero coefficients are removed; the zero polynomial is `[0]`.
///
/// ```
/// use variate_core::symbolic::{polynomial, Expr};
///
/// let e = Expr::parse("(x - 1)*(x + 2)").unwrap();
/// let coeffs = polynomial::collect(&e, "x").unwrap();
/// let values: Vec<f64> = coeffs.iter().map(|c| c.as_num().unwrap()).collect();
/// assert_eq!(values, vec![-2.0, 1.0, 1.0]);
/// ```
pub fn collect(expr: &Expr, var: &str) -> Option<Coefficients> {
    let coeffs = collect_raw(expr, var)?;
    Some(trim(coeffs.into_iter().map(|c| c.simplify()).collect()))
}

/// Degree of the collected polynomial.
pub fn degree(coeffs: &[Expr]) -> usize {
    coeffs.len().saturating_sub(1)
}

/// Returns `(slope, intercept)` when `expr` is exactly linear in `var`.
pub fn linear(expr: &Expr, var: &str) -> Option<(Expr, Expr)> {
    let coeffs = collect(expr, var)?;
    if coeffs.len() != 2 {
        return None;
    }
    let mut it = coeffs.into_iter();
    let intercept = it.next()?;
    let slope = it.next()?;
    Some((slope, intercept))
}

fn trim(mut coeffs: Coefficients) -> Coefficients {
    while coeffs.len() > 1 && coeffs.last().is_some_and(Expr::is_zero) {
        coeffs.pop();
    }
    if coeffs.is_empty() {
        coeffs.push(Expr::Num(0.0));
    }
    coeffs
}

fn collect_raw(expr: &Expr, var: &str) -> Option<Coefficients> {
    if !expr.contains(var) {
        return Some(vec![expr.clone()]);
    }
    match expr {
        Expr::Sym(_) => Some(vec![Expr::Num(0.0), Expr::Num(1.0)]),
        Expr::Neg(u) => Some(collect_raw(u, var)?.into_iter().map(|c| -c).collect()),
        Expr::Add(u, v) => Some(add(collect_raw(u, var)?, collect_raw(v, var)?, false)),
        Expr::Sub(u, v) => Some(add(collect_raw(u, var)?, collect_raw(v, var)?, true)),
        Expr::Mul(u, v) => multiply(&collect_raw(u, var)?, &collect_raw(v, var)?),
        Expr::Div(u, v) if !v.contains(var) => Some(
            collect_raw(u, var)?
                .into_iter()
                .map(|c| c / (**v).clone())
                .collect(),
        ),
        Expr::Pow(base, exponent) => {
            let n = exponent.simplify().as_num()?;
            if n < 0.0 || n.fract() != 0.0 || n > MAX_DEGREE as f64 {
                return None;
            }
            let base = collect_raw(base, var)?;
            let mut result = vec![Expr::Num(1.0)];
            for _ in 0..(n as usize) {
                result = multiply(&result, &base)?;
            }
            Some(result)
        }
        _ => None,
    }
}

fn add(lhs: Coefficients, rhs: Coefficients, subtract: bool) -> Coefficients {
    let len = lhs.len().max(rhs.len());
    let mut lhs = lhs.into_iter();
    let mut rhs = rhs.into_iter();
    (0..len)
        .map(|_| match (lhs.next(), rhs.next()) {
            (Some(a), Some(b)) if subtract => (a - b).simplify(),
            (Some(a), Some(b)) => (a + b).simplify(),
            (Some(a), None) => a,
            (None, Some(b)) if subtract => (-b).simplify(),
            (None, Some(b)) => b,
            (None, None) => Expr::Num(0.0),
        })
        .collect()
}

fn multiply(lhs: &[Expr], rhs: &[Expr]) -> Option<Coefficients> {
    let len = lhs.len() + rhs.len() - 1;
    if len > MAX_DEGREE + 1 {
        return None;
    }
    let mut out = vec![Expr::Num(0.0); len];
    for (i, a) in lhs.iter().enumerate() {
        if a.is_zero() {
            continue;
        }
        for (j, b) in rhs.iter().enumerate() {
            if b.is_zero() {
                continue;
            }
            let term = (a.clone() * b.clone()).simplify();
            out[i + j] = (out[i + j].clone() + term).simplify();
        }
    }
    Some(out)
}
