//! Expression tree for single-variable symbolic algebra.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::types::SymbolicError;

/// Elementary functions understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Func {
    /// Natural exponential.
    Exp,
    /// Natural logarithm (`ln` or `log`).
    Ln,
    /// Square root.
    Sqrt,
    /// Real cube root, defined for negative arguments.
    Cbrt,
    /// Sine.
    Sin,
    /// Cosine.
    Cos,
    /// Tangent.
    Tan,
    /// Inverse sine.
    Asin,
    /// Inverse cosine.
    Acos,
    /// Inverse tangent.
    Atan,
    /// Absolute value.
    Abs,
}

impl Func {
    /// Looks up a function by its textual name.
    pub fn from_name(name: &str) -> Option<Self> {
        let func = match name {
            "exp" => Func::Exp,
            "ln" | "log" => Func::Ln,
            "sqrt" => Func::Sqrt,
            "cbrt" => Func::Cbrt,
            "sin" => Func::Sin,
            "cos" => Func::Cos,
            "tan" => Func::Tan,
            "asin" => Func::Asin,
            "acos" => Func::Acos,
            "atan" => Func::Atan,
            "abs" => Func::Abs,
            _ => return None,
        };
        Some(func)
    }

    /// Canonical name used when rendering.
    pub fn name(self) -> &'static str {
        match self {
            Func::Exp => "exp",
            Func::Ln => "ln",
            Func::Sqrt => "sqrt",
            Func::Cbrt => "cbrt",
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Asin => "asin",
            Func::Acos => "acos",
            Func::Atan => "atan",
            Func::Abs => "abs",
        }
    }

    /// Applies the function to a number.
    #[inline]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Func::Exp => x.exp(),
            Func::Ln => x.ln(),
            Func::Sqrt => x.sqrt(),
            Func::Cbrt => x.cbrt(),
            Func::Sin => x.sin(),
            Func::Cos => x.cos(),
            Func::Tan => x.tan(),
            Func::Asin => x.asin(),
            Func::Acos => x.acos(),
            Func::Atan => x.atan(),
            Func::Abs => x.abs(),
        }
    }
}

/// `base ^ exponent` over the reals.
///
/// Odd roots of negative numbers are real: `(-8)^(1/3) = -2` where
/// `powf` would give NaN. Other negative bases with a fractional exponent
/// stay NaN.
#[inline]
pub fn real_pow(base: f64, exponent: f64) -> f64 {
    if base < 0.0 && exponent.fract() != 0.0 {
        let degree = exponent.recip();
        let rounded = degree.round();
        if (degree - rounded).abs() < 1e-9 && rounded as i64 % 2 != 0 {
            return -(-base).powf(exponent);
        }
    }
    base.powf(exponent)
}

/// A symbolic expression.
///
/// Expressions are immutable trees; every transformation returns a new tree.
/// Arithmetic operators are overloaded so expressions can be assembled
/// directly:
///
/// ```
/// use variate_core::symbolic::Expr;
///
/// let x = Expr::sym("x");
/// let cdf = (x.clone() - Expr::num(2.0)) / Expr::num(3.0);
/// assert_eq!(cdf.eval_at("x", 5.0).unwrap(), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal.
    Num(f64),
    /// Named symbol.
    Sym(String),
    /// Negation.
    Neg(Box<Expr>),
    /// Sum.
    Add(Box<Expr>, Box<Expr>),
    /// Difference.
    Sub(Box<Expr>, Box<Expr>),
    /// Product.
    Mul(Box<Expr>, Box<Expr>),
    /// Quotient.
    Div(Box<Expr>, Box<Expr>),
    /// Power.
    Pow(Box<Expr>, Box<Expr>),
    /// Function application.
    Call(Func, Box<Expr>),
}

impl Expr {
    /// Numeric literal.
    #[inline]
    pub fn num(value: f64) -> Self {
        Expr::Num(value)
    }

    /// Named symbol.
    #[inline]
    pub fn sym(name: impl Into<String>) -> Self {
        Expr::Sym(name.into())
    }

    /// `self ^ exponent`.
    pub fn pow(self, exponent: Expr) -> Self {
        Expr::Pow(Box::new(self), Box::new(exponent))
    }

    /// Applies `func` to `self`.
    pub fn call(self, func: Func) -> Self {
        Expr::Call(func, Box::new(self))
    }

    /// Parses expression text. See [`crate::symbolic::parser`] for the grammar.
    pub fn parse(text: &str) -> Result<Self, SymbolicError> {
        super::parser::parse(text)
    }

    /// Returns the literal value if this is a number.
    #[inline]
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Expr::Num(v) => Some(*v),
            _ => None,
        }
    }

    /// True for the literal `0`.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.as_num() == Some(0.0)
    }

    /// True for the literal `1`.
    #[inline]
    pub fn is_one(&self) -> bool {
        self.as_num() == Some(1.0)
    }

    /// True if `var` occurs anywhere in the expression.
    pub fn contains(&self, var: &str) -> bool {
        self.occurrences(var) > 0
    }

    /// Counts the occurrences of `var`.
    pub fn occurrences(&self, var: &str) -> usize {
        match self {
            Expr::Num(_) => 0,
            Expr::Sym(name) => usize::from(name == var),
            Expr::Neg(u) | Expr::Call(_, u) => u.occurrences(var),
            Expr::Add(u, v) | Expr::Sub(u, v) | Expr::Mul(u, v) | Expr::Div(u, v) | Expr::Pow(u, v) => {
                u.occurrences(var) + v.occurrences(var)
            }
        }
    }

    /// Names of all symbols in the expression, sorted.
    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut symbols = BTreeSet::new();
        self.collect_symbols(&mut symbols);
        symbols
    }

    fn collect_symbols(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Num(_) => {}
            Expr::Sym(name) => {
                out.insert(name.clone());
            }
            Expr::Neg(u) | Expr::Call(_, u) => u.collect_symbols(out),
            Expr::Add(u, v) | Expr::Sub(u, v) | Expr::Mul(u, v) | Expr::Div(u, v) | Expr::Pow(u, v) => {
                u.collect_symbols(out);
                v.collect_symbols(out);
            }
        }
    }

    /// Replaces every occurrence of `var` with `replacement`.
    pub fn substitute(&self, var: &str, replacement: &Expr) -> Expr {
        let sub = |e: &Expr| Box::new(e.substitute(var, replacement));
        match self {
            Expr::Num(_) => self.clone(),
            Expr::Sym(name) if name == var => replacement.clone(),
            Expr::Sym(_) => self.clone(),
            Expr::Neg(u) => Expr::Neg(sub(u)),
            Expr::Call(f, u) => Expr::Call(*f, sub(u)),
            Expr::Add(u, v) => Expr::Add(sub(u), sub(v)),
            Expr::Sub(u, v) => Expr::Sub(sub(u), sub(v)),
            Expr::Mul(u, v) => Expr::Mul(sub(u), sub(v)),
            Expr::Div(u, v) => Expr::Div(sub(u), sub(v)),
            Expr::Pow(u, v) => Expr::Pow(sub(u), sub(v)),
        }
    }

    /// Evaluates the expression with the given symbol bindings.
    ///
    /// The result may be non-finite (e.g. `ln(0)`); callers decide whether
    /// that is acceptable. Missing bindings are reported as
    /// [`SymbolicError::UnboundSymbol`].
    pub fn eval(&self, bindings: &HashMap<String, f64>) -> Result<f64, SymbolicError> {
        let value = match self {
            Expr::Num(v) => *v,
            Expr::Sym(name) => *bindings
                .get(name)
                .ok_or_else(|| SymbolicError::UnboundSymbol(name.clone()))?,
            Expr::Neg(u) => -u.eval(bindings)?,
            Expr::Call(f, u) => f.apply(u.eval(bindings)?),
            Expr::Add(u, v) => u.eval(bindings)? + v.eval(bindings)?,
            Expr::Sub(u, v) => u.eval(bindings)? - v.eval(bindings)?,
            Expr::Mul(u, v) => u.eval(bindings)? * v.eval(bindings)?,
            Expr::Div(u, v) => u.eval(bindings)? / v.eval(bindings)?,
            Expr::Pow(u, v) => real_pow(u.eval(bindings)?, v.eval(bindings)?),
        };
        Ok(value)
    }

    /// Evaluates with a single binding `var = value`.
    pub fn eval_at(&self, var: &str, value: f64) -> Result<f64, SymbolicError> {
        let mut bindings = HashMap::with_capacity(1);
        bindings.insert(var.to_string(), value);
        self.eval(&bindings)
    }

    /// Binding strength used by the renderer.
    fn precedence(&self) -> u8 {
        match self {
            Expr::Add(..) | Expr::Sub(..) => 1,
            Expr::Mul(..) | Expr::Div(..) => 2,
            Expr::Neg(_) => 3,
            Expr::Num(v) if *v < 0.0 => 3,
            Expr::Pow(..) => 4,
            _ => 5,
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, operand: &Expr, min_precedence: u8) -> fmt::Result {
    if operand.precedence() < min_precedence {
        write!(f, "({})", operand)
    } else {
        write!(f, "{}", operand)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Num(v) => write!(f, "{}", v),
            Expr::Sym(name) => write!(f, "{}", name),
            Expr::Neg(u) => {
                write!(f, "-")?;
                write_operand(f, u, 4)
            }
            Expr::Add(u, v) => {
                write_operand(f, u, 1)?;
                write!(f, " + ")?;
                write_operand(f, v, 1)
            }
            Expr::Sub(u, v) => {
                write_operand(f, u, 1)?;
                write!(f, " - ")?;
                write_operand(f, v, 2)
            }
            Expr::Mul(u, v) => {
                write_operand(f, u, 2)?;
                write!(f, "*")?;
                write_operand(f, v, 3)
            }
            Expr::Div(u, v) => {
                write_operand(f, u, 2)?;
                write!(f, "/")?;
                write_operand(f, v, 4)
            }
            Expr::Pow(u, v) => {
                write_operand(f, u, 5)?;
                write!(f, "^")?;
                write_operand(f, v, 4)
            }
            Expr::Call(func, u) => write!(f, "{}({})", func.name(), u),
        }
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Num(value)
    }
}

impl Add for Expr {
    type Output = Expr;
    fn add(self, rhs: Expr) -> Expr {
        Expr::Add(Box::new(self), Box::new(rhs))
    }
}

impl Sub for Expr {
    type Output = Expr;
    fn sub(self, rhs: Expr) -> Expr {
        Expr::Sub(Box::new(self), Box::new(rhs))
    }
}

impl Mul for Expr {
    type Output = Expr;
    fn mul(self, rhs: Expr) -> Expr {
        Expr::Mul(Box::new(self), Box::new(rhs))
    }
}

impl Div for Expr {
    type Output = Expr;
    fn div(self, rhs: Expr) -> Expr {
        Expr::Div(Box::new(self), Box::new(rhs))
    }
}

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::Neg(Box::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_real_pow_odd_roots() {
        assert_relative_eq!(real_pow(-8.0, 1.0 / 3.0), -2.0, epsilon = 1e-12);
        assert_relative_eq!(real_pow(-32.0, 0.2), -2.0, epsilon = 1e-12);
        assert_relative_eq!(real_pow(-8.0, -1.0 / 3.0), -0.5, epsilon = 1e-12);
        assert_eq!(real_pow(-2.0, 2.0), 4.0);
        assert!(real_pow(-4.0, 0.5).is_nan());
        assert!(real_pow(-8.0, 2.0 / 3.0).is_nan());
    }

    #[test]
    fn test_cbrt_parses_and_evaluates() {
        let e = Expr::parse("cbrt(2*r - 1)").unwrap();
        assert_eq!(e.to_string(), "cbrt(2*r - 1)");
        assert_relative_eq!(e.eval_at("r", 0.0).unwrap(), -1.0);
        assert_relative_eq!(e.compile("r").unwrap().eval(-3.5), -2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_occurrences_and_contains() {
        let x = Expr::sym("x");
        let e = x.clone() * x.clone() + Expr::sym("r");
        assert_eq!(e.occurrences("x"), 2);
        assert!(e.contains("r"));
        assert!(!e.contains("y"));
    }

    #[test]
    fn test_free_symbols_sorted() {
        let e = Expr::sym("lambda") * Expr::sym("x").call(Func::Exp);
        let symbols: Vec<_> = e.free_symbols().into_iter().collect();
        assert_eq!(symbols, vec!["lambda".to_string(), "x".to_string()]);
    }

    #[test]
    fn test_substitute() {
        let e = Expr::sym("x") * Expr::num(3.0);
        let replaced = e.substitute("x", &Expr::num(2.0));
        assert_relative_eq!(replaced.eval(&HashMap::new()).unwrap(), 6.0);
    }

    #[test]
    fn test_eval_unbound_symbol() {
        let e = Expr::sym("x") + Expr::sym("k");
        let err = e.eval_at("x", 1.0).unwrap_err();
        assert_eq!(err, SymbolicError::UnboundSymbol("k".to_string()));
    }

    #[test]
    fn test_display_precedence() {
        let x = Expr::sym("x");
        let e = (x.clone() + Expr::num(1.0)) * x.clone();
        assert_eq!(e.to_string(), "(x + 1)*x");

        let e = x.clone() - (x.clone() - Expr::num(1.0));
        assert_eq!(e.to_string(), "x - (x - 1)");

        let e = -(x.clone() * Expr::num(2.0));
        assert_eq!(e.to_string(), "-(x*2)");

        let e = x.clone() / (Expr::num(2.0) * x.clone());
        assert_eq!(e.to_string(), "x/(2*x)");

        let e = Expr::num(-2.0).pow(x.clone());
        assert_eq!(e.to_string(), "(-2)^x");
    }

    #[test]
    fn test_display_function_call() {
        let e = (Expr::num(-2.0) * Expr::sym("x")).call(Func::Exp);
        assert_eq!(e.to_string(), "exp(-2*x)");
    }

    #[test]
    fn test_func_lookup() {
        assert_eq!(Func::from_name("log"), Some(Func::Ln));
        assert_eq!(Func::from_name("gamma"), None);
        assert_eq!(Func::Ln.name(), "ln");
    }
}
