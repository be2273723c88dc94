//! Differentiation and integration.
//!
//! Integration covers the forms that appear in textbook densities:
//! polynomials, constant multiples and sums, `(a*x + b)^n`, `1/(a*x + b)`,
//! `k^(a*x + b)` and `exp`, `sin`, `cos`, `sqrt`, `ln` of a linear
//! argument. Anything else is reported as unsupported rather than guessed.
//! Antiderivatives carry no integration constant and `1/x` integrates to
//! `ln(x)` (not `ln|x|`), matching the positive supports densities live on.

use super::expr::{Expr, Func};
use super::polynomial;
use crate::types::SymbolicError;

fn unsupported(operation: &'static str, expr: &Expr) -> SymbolicError {
    SymbolicError::Unsupported {
        operation,
        expression: expr.to_string(),
    }
}

/// Derivative of `expr` with respect to `var`, simplified.
///
/// ```
/// use variate_core::symbolic::{differentiate, Expr};
///
/// let density = Expr::parse("6*x*(1 - x)").unwrap();
/// let slope = differentiate(&density, "x").unwrap();
/// assert!(slope.eval_at("x", 0.5).unwrap().abs() < 1e-12);
/// ```
pub fn differentiate(expr: &Expr, var: &str) -> Result<Expr, SymbolicError> {
    Ok(derive(expr, var)?.simplify())
}

fn derive(expr: &Expr, var: &str) -> Result<Expr, SymbolicError> {
    if !expr.contains(var) {
        return Ok(Expr::Num(0.0));
    }
    let d = match expr {
        Expr::Num(_) => Expr::Num(0.0),
        Expr::Sym(_) => Expr::Num(1.0),
        Expr::Neg(u) => -derive(u, var)?,
        Expr::Add(u, v) => derive(u, var)? + derive(v, var)?,
        Expr::Sub(u, v) => derive(u, var)? - derive(v, var)?,
        Expr::Mul(u, v) => {
            derive(u, var)? * (**v).clone() + (**u).clone() * derive(v, var)?
        }
        Expr::Div(u, v) => {
            let numerator = derive(u, var)? * (**v).clone() - (**u).clone() * derive(v, var)?;
            numerator / (**v).clone().pow(Expr::Num(2.0))
        }
        Expr::Pow(base, exponent) if !exponent.contains(var) => {
            // n * u^(n-1) * u'
            (**exponent).clone()
                * (**base).clone().pow((**exponent).clone() - Expr::Num(1.0))
                * derive(base, var)?
        }
        Expr::Pow(base, exponent) if !base.contains(var) => {
            expr.clone() * (**base).clone().call(Func::Ln) * derive(exponent, var)?
        }
        Expr::Pow(base, exponent) => {
            // u^v = exp(v ln u)
            let log_form = ((**exponent).clone() * (**base).clone().call(Func::Ln)).call(Func::Exp);
            derive(&log_form, var)?
        }
        Expr::Call(func, u) => {
            let inner = (**u).clone();
            let du = derive(u, var)?;
            let outer = match func {
                Func::Exp => inner.call(Func::Exp),
                Func::Ln => Expr::Num(1.0) / inner,
                Func::Sqrt => Expr::Num(1.0) / (Expr::Num(2.0) * inner.call(Func::Sqrt)),
                Func::Cbrt => {
                    Expr::Num(1.0) / (Expr::Num(3.0) * inner.call(Func::Cbrt).pow(Expr::Num(2.0)))
                }
                Func::Sin => inner.call(Func::Cos),
                Func::Cos => -inner.call(Func::Sin),
                Func::Tan => Expr::Num(1.0) / inner.call(Func::Cos).pow(Expr::Num(2.0)),
                Func::Asin => {
                    Expr::Num(1.0)
                        / (Expr::Num(1.0) - inner.pow(Expr::Num(2.0))).call(Func::Sqrt)
                }
                Func::Acos => {
                    -(Expr::Num(1.0)
                        / (Expr::Num(1.0) - inner.pow(Expr::Num(2.0))).call(Func::Sqrt))
                }
                Func::Atan => Expr::Num(1.0) / (Expr::Num(1.0) + inner.pow(Expr::Num(2.0))),
                Func::Abs => inner.clone() / inner.call(Func::Abs),
            };
            outer * du
        }
    };
    Ok(d)
}

/// Antiderivative of `expr` with respect to `var`, simplified.
///
/// # Errors
///
/// [`SymbolicError::Unsupported`] when no rule applies (e.g. `x*exp(x)`,
/// `exp(-x^2)`).
///
/// ```
/// use variate_core::symbolic::{integrate, Expr};
///
/// let density = Expr::parse("2*exp(-2*x)").unwrap();
/// let antiderivative = integrate(&density, "x").unwrap();
/// assert!((antiderivative.eval_at("x", 0.0).unwrap() + 1.0).abs() < 1e-12);
/// ```
pub fn integrate(expr: &Expr, var: &str) -> Result<Expr, SymbolicError> {
    let expr = expr.simplify();
    Ok(antiderivative(&expr, var)?.simplify())
}

fn antiderivative(expr: &Expr, var: &str) -> Result<Expr, SymbolicError> {
    let x = Expr::sym(var);

    if !expr.contains(var) {
        return Ok(expr.clone() * x);
    }

    if let Some(coeffs) = polynomial::collect(expr, var) {
        let terms = coeffs
            .into_iter()
            .enumerate()
            .filter(|(_, c)| !c.is_zero())
            .map(|(k, c)| {
                let power = Expr::Num((k + 1) as f64);
                c * x.clone().pow(power.clone()) / power
            });
        return Ok(terms
            .reduce(|acc, term| acc + term)
            .unwrap_or(Expr::Num(0.0)));
    }

    match expr {
        Expr::Neg(u) => Ok(-antiderivative(u, var)?),
        Expr::Add(u, v) => Ok(antiderivative(u, var)? + antiderivative(v, var)?),
        Expr::Sub(u, v) => Ok(antiderivative(u, var)? - antiderivative(v, var)?),
        Expr::Mul(u, v) if !u.contains(var) => Ok((**u).clone() * antiderivative(v, var)?),
        Expr::Mul(u, v) if !v.contains(var) => Ok(antiderivative(u, var)? * (**v).clone()),
        Expr::Div(u, v) if !v.contains(var) => Ok(antiderivative(u, var)? / (**v).clone()),
        Expr::Div(u, v) if !u.contains(var) => {
            // c / (a x + b)^n
            if let Some((slope, _)) = polynomial::linear(v, var) {
                return Ok((**u).clone() * (**v).clone().call(Func::Ln) / slope);
            }
            if let Expr::Pow(base, exponent) = &**v {
                let reciprocal = (**base).clone().pow(-(**exponent).clone());
                return Ok((**u).clone() * antiderivative(&reciprocal.simplify(), var)?);
            }
            Err(unsupported("integration", expr))
        }
        Expr::Pow(base, exponent) if !exponent.contains(var) => {
            let (slope, _) =
                polynomial::linear(base, var).ok_or_else(|| unsupported("integration", expr))?;
            let n = (**exponent).clone().simplify();
            if n.as_num() == Some(-1.0) {
                return Ok((**base).clone().call(Func::Ln) / slope);
            }
            let raised = (n + Expr::Num(1.0)).simplify();
            Ok((**base).clone().pow(raised.clone()) / (raised * slope))
        }
        Expr::Pow(base, exponent) if !base.contains(var) => {
            let (slope, _) =
                polynomial::linear(exponent, var).ok_or_else(|| unsupported("integration", expr))?;
            Ok(expr.clone() / ((**base).clone().call(Func::Ln) * slope))
        }
        Expr::Call(func, u) => {
            let (slope, _) =
                polynomial::linear(u, var).ok_or_else(|| unsupported("integration", expr))?;
            let inner = (**u).clone();
            let primitive = match func {
                Func::Exp => inner.call(Func::Exp),
                Func::Sin => -inner.call(Func::Cos),
                Func::Cos => inner.call(Func::Sin),
                Func::Sqrt => {
                    Expr::Num(2.0 / 3.0) * inner.pow(Expr::Num(1.5))
                }
                Func::Cbrt => Expr::Num(0.75) * inner.clone() * inner.call(Func::Cbrt),
                Func::Ln => inner.clone() * inner.clone().call(Func::Ln) - inner,
                _ => return Err(unsupported("integration", expr)),
            };
            Ok(primitive / slope)
        }
        _ => Err(unsupported("integration", expr)),
    }
}
