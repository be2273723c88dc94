//! Algebraic simplification.
//!
//! A bottom-up rewrite applying constant folding and the usual identities
//! (`0 + u`, `1*u`, `u^1`, double negation, ...). Rewriting repeats until
//! the tree stops changing. The result is equivalent to the input wherever
//! the input is defined; `0/u` is folded to `0` without checking `u`.

use super::expr::{real_pow, Expr};

const MAX_PASSES: usize = 8;

impl Expr {
    /// Returns a simplified copy of the expression.
    pub fn simplify(&self) -> Expr {
        let mut current = self.clone();
        for _ in 0..MAX_PASSES {
            let next = simplify_once(&current);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }
}

/// Folds only when the result is a finite number.
fn fold(value: f64) -> Option<Expr> {
    value.is_finite().then_some(Expr::Num(value))
}

fn simplify_once(expr: &Expr) -> Expr {
    match expr {
        Expr::Num(_) | Expr::Sym(_) => expr.clone(),
        Expr::Neg(u) => simplify_neg(simplify_once(u)),
        Expr::Add(u, v) => simplify_add(simplify_once(u), simplify_once(v)),
        Expr::Sub(u, v) => simplify_sub(simplify_once(u), simplify_once(v)),
        Expr::Mul(u, v) => simplify_mul(simplify_once(u), simplify_once(v)),
        Expr::Div(u, v) => simplify_div(simplify_once(u), simplify_once(v)),
        Expr::Pow(u, v) => simplify_pow(simplify_once(u), simplify_once(v)),
        Expr::Call(f, u) => {
            let u = simplify_once(u);
            if let Some(folded) = u.as_num().and_then(|a| fold(f.apply(a))) {
                return folded;
            }
            Expr::Call(*f, Box::new(u))
        }
    }
}

fn simplify_neg(u: Expr) -> Expr {
    match u {
        Expr::Num(a) => Expr::Num(-a),
        Expr::Neg(inner) => *inner,
        Expr::Sub(a, b) => Expr::Sub(b, a),
        Expr::Mul(a, b) if a.as_num().is_some() => simplify_mul(simplify_neg(*a), *b),
        other => -other,
    }
}

fn simplify_add(u: Expr, v: Expr) -> Expr {
    match (&u, &v) {
        (Expr::Num(a), Expr::Num(b)) => fold(a + b).unwrap_or(u + v),
        _ if u.is_zero() => v,
        _ if v.is_zero() => u,
        (_, Expr::Num(b)) if *b < 0.0 => u - Expr::Num(-b),
        (_, Expr::Neg(inner)) => u - (**inner).clone(),
        (Expr::Neg(inner), _) => v - (**inner).clone(),
        // Collect numeric terms: (w + a) + b -> w + (a + b)
        (Expr::Add(w, a), Expr::Num(b)) if a.as_num().is_some() => {
            simplify_add((**w).clone(), Expr::Num(a.as_num().unwrap_or(0.0) + b))
        }
        (Expr::Sub(w, a), Expr::Num(b)) if a.as_num().is_some() => {
            simplify_add((**w).clone(), Expr::Num(b - a.as_num().unwrap_or(0.0)))
        }
        _ => u + v,
    }
}

fn simplify_sub(u: Expr, v: Expr) -> Expr {
    match (&u, &v) {
        (Expr::Num(a), Expr::Num(b)) => fold(a - b).unwrap_or(u - v),
        _ if v.is_zero() => u,
        _ if u.is_zero() => simplify_neg(v),
        _ if u == v => Expr::Num(0.0),
        (_, Expr::Num(b)) if *b < 0.0 => simplify_add(u, Expr::Num(-b)),
        (_, Expr::Neg(inner)) => simplify_add(u.clone(), (**inner).clone()),
        (Expr::Add(w, a), Expr::Num(b)) if a.as_num().is_some() => {
            simplify_add((**w).clone(), Expr::Num(a.as_num().unwrap_or(0.0) - b))
        }
        (Expr::Sub(w, a), Expr::Num(b)) if a.as_num().is_some() => {
            simplify_sub((**w).clone(), Expr::Num(a.as_num().unwrap_or(0.0) + b))
        }
        _ => u - v,
    }
}

fn simplify_mul(u: Expr, v: Expr) -> Expr {
    match (&u, &v) {
        (Expr::Num(a), Expr::Num(b)) => fold(a * b).unwrap_or(u * v),
        _ if u.is_zero() || v.is_zero() => Expr::Num(0.0),
        _ if u.is_one() => v,
        _ if v.is_one() => u,
        (Expr::Num(a), _) if *a == -1.0 => simplify_neg(v),
        (_, Expr::Num(b)) if *b == -1.0 => simplify_neg(u),
        // Coefficient first
        (_, Expr::Num(_)) => simplify_mul(v, u),
        (Expr::Num(a), Expr::Mul(b, w)) if b.as_num().is_some() => {
            simplify_mul(Expr::Num(a * b.as_num().unwrap_or(1.0)), (**w).clone())
        }
        (Expr::Num(a), Expr::Div(n, d)) if n.as_num().is_some() => simplify_div(
            Expr::Num(a * n.as_num().unwrap_or(1.0)),
            (**d).clone(),
        ),
        (Expr::Num(a), Expr::Div(n, d)) if d.as_num().is_some() => {
            let scale = a / d.as_num().unwrap_or(1.0);
            simplify_mul(Expr::Num(scale), (**n).clone())
        }
        (Expr::Neg(a), _) => simplify_neg(simplify_mul((**a).clone(), v)),
        (_, Expr::Neg(b)) => simplify_neg(simplify_mul(u, (**b).clone())),
        _ => u * v,
    }
}

fn simplify_div(u: Expr, v: Expr) -> Expr {
    match (&u, &v) {
        (Expr::Num(a), Expr::Num(b)) if *b != 0.0 => fold(a / b).unwrap_or(u / v),
        _ if v.is_one() => u,
        _ if u.is_zero() && !v.is_zero() => Expr::Num(0.0),
        _ if u == v && !u.is_zero() => Expr::Num(1.0),
        (Expr::Mul(a, w), Expr::Num(b)) if a.as_num().is_some() && *b != 0.0 => {
            simplify_mul(Expr::Num(a.as_num().unwrap_or(1.0) / b), (**w).clone())
        }
        (Expr::Neg(a), _) => simplify_neg(simplify_div((**a).clone(), v)),
        (_, Expr::Neg(b)) => simplify_neg(simplify_div(u, (**b).clone())),
        (_, Expr::Num(b)) if *b < 0.0 => simplify_neg(simplify_div(u, Expr::Num(-b))),
        _ => u / v,
    }
}

fn simplify_pow(u: Expr, v: Expr) -> Expr {
    match (&u, &v) {
        (Expr::Num(a), Expr::Num(b)) => fold(real_pow(*a, *b)).unwrap_or(u.pow(v)),
        _ if v.is_zero() => Expr::Num(1.0),
        _ if v.is_one() => u,
        _ if u.is_one() => Expr::Num(1.0),
        _ => u.pow(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::Func;

    fn x() -> Expr {
        Expr::sym("x")
    }

    #[test]
    fn test_constant_folding() {
        let e = Expr::num(2.0) * Expr::num(3.0) + Expr::num(1.0);
        assert_eq!(e.simplify(), Expr::Num(7.0));
    }

    #[test]
    fn test_identities() {
        assert_eq!((x() + Expr::num(0.0)).simplify(), x());
        assert_eq!((Expr::num(1.0) * x()).simplify(), x());
        assert_eq!((x() * Expr::num(0.0)).simplify(), Expr::Num(0.0));
        assert_eq!(x().pow(Expr::num(1.0)).simplify(), x());
        assert_eq!(x().pow(Expr::num(0.0)).simplify(), Expr::Num(1.0));
        assert_eq!((x() / Expr::num(1.0)).simplify(), x());
        assert_eq!((x() - x()).simplify(), Expr::Num(0.0));
    }

    #[test]
    fn test_double_negation() {
        assert_eq!((-(-x())).simplify(), x());
        assert_eq!((-Expr::num(3.0)).simplify(), Expr::Num(-3.0));
    }

    #[test]
    fn test_coefficient_moves_first() {
        assert_eq!((x() * Expr::num(3.0)).simplify(), Expr::num(3.0) * x());
        let nested = Expr::num(2.0) * (Expr::num(3.0) * x());
        assert_eq!(nested.simplify(), Expr::num(6.0) * x());
    }

    #[test]
    fn test_numeric_terms_collected() {
        let e = (x() + Expr::num(2.0)) - Expr::num(5.0);
        assert_eq!(e.simplify(), x() - Expr::num(3.0));
    }

    #[test]
    fn test_negative_literal_turns_into_subtraction() {
        let e = x() + Expr::num(-2.0);
        assert_eq!(e.simplify(), x() - Expr::num(2.0));
    }

    #[test]
    fn test_division_by_negative_constant() {
        let e = x().call(Func::Ln) / Expr::num(-2.0);
        assert_eq!(e.simplify(), -(x().call(Func::Ln) / Expr::num(2.0)));
    }

    #[test]
    fn test_function_of_constant_folds() {
        assert_eq!(Expr::num(0.0).call(Func::Exp).simplify(), Expr::Num(1.0));
        // ln(0) is -inf: left symbolic
        let e = Expr::num(0.0).call(Func::Ln);
        assert_eq!(e.simplify(), e);
    }

    #[test]
    fn test_simplify_preserves_value() {
        let e = Expr::parse("(x*3 - -2)/1 + 0*x - (-(x))").unwrap();
        let s = e.simplify();
        for v in [-1.5, 0.0, 2.0] {
            assert!((e.eval_at("x", v).unwrap() - s.eval_at("x", v).unwrap()).abs() < 1e-12);
        }
    }
}
