//! Compiled single-variable evaluation.
//!
//! Tree-walking evaluation clones bindings and follows boxes on every call.
//! Samplers evaluate the same density or inverse CDF millions of times, so
//! [`CompiledExpr`] flattens the tree once into a postfix program over a
//! value stack. Shallow programs evaluate on a fixed-size array.

use super::expr::{real_pow, Expr, Func};
use crate::types::SymbolicError;

/// Stack depth evaluated without touching the heap.
const INLINE_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Op {
    Const(f64),
    Var,
    Neg,
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Call(Func),
}

/// An expression compiled against a single free variable.
///
/// ```
/// use variate_core::symbolic::Expr;
///
/// let inverse = Expr::parse("-ln(1 - r)/2").unwrap();
/// let q = inverse.compile("r").unwrap();
/// assert!((q.eval(0.5) - 0.5_f64.ln().abs() / 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct CompiledExpr {
    program: Vec<Op>,
    variable: String,
    max_depth: usize,
}

impl CompiledExpr {
    /// Name of the variable the program reads.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Evaluates the program at `value`.
    ///
    /// Undefined operations follow IEEE semantics (NaN or infinities).
    pub fn eval(&self, value: f64) -> f64 {
        if self.max_depth <= INLINE_DEPTH {
            self.run(value, &mut [0.0; INLINE_DEPTH])
        } else {
            self.run(value, &mut vec![0.0; self.max_depth])
        }
    }

    // `stack` holds at least `max_depth` slots, which `emit` guarantees
    // is enough for every prefix of the program.
    fn run(&self, value: f64, stack: &mut [f64]) -> f64 {
        let mut top = 0usize;
        for op in &self.program {
            match *op {
                Op::Const(c) => {
                    stack[top] = c;
                    top += 1;
                }
                Op::Var => {
                    stack[top] = value;
                    top += 1;
                }
                Op::Neg => stack[top - 1] = -stack[top - 1],
                Op::Call(func) => stack[top - 1] = func.apply(stack[top - 1]),
                binary => {
                    top -= 1;
                    let (a, b) = (stack[top - 1], stack[top]);
                    stack[top - 1] = match binary {
                        Op::Add => a + b,
                        Op::Sub => a - b,
                        Op::Mul => a * b,
                        Op::Div => a / b,
                        _ => real_pow(a, b),
                    };
                }
            }
        }
        if top == 0 {
            f64::NAN
        } else {
            stack[top - 1]
        }
    }
}

impl Expr {
    /// Compiles the expression as a function of `var`.
    ///
    /// # Errors
    ///
    /// [`SymbolicError::UnboundSymbol`] if any symbol other than `var` occurs.
    pub fn compile(&self, var: &str) -> Result<CompiledExpr, SymbolicError> {
        if let Some(other) = self.free_symbols().into_iter().find(|s| s != var) {
            return Err(SymbolicError::UnboundSymbol(other));
        }
        let simplified = self.simplify();
        let mut program = Vec::new();
        let max_depth = emit(&simplified, &mut program);
        Ok(CompiledExpr {
            program,
            variable: var.to_string(),
            max_depth,
        })
    }
}

/// Appends the postfix program for `expr`, returning its stack depth.
fn emit(expr: &Expr, program: &mut Vec<Op>) -> usize {
    match expr {
        Expr::Num(v) => {
            program.push(Op::Const(*v));
            1
        }
        Expr::Sym(_) => {
            program.push(Op::Var);
            1
        }
        Expr::Neg(u) => {
            let depth = emit(u, program);
            program.push(Op::Neg);
            depth
        }
        Expr::Call(func, u) => {
            let depth = emit(u, program);
            program.push(Op::Call(*func));
            depth
        }
        Expr::Add(u, v) | Expr::Sub(u, v) | Expr::Mul(u, v) | Expr::Div(u, v) | Expr::Pow(u, v) => {
            let left = emit(u, program);
            let right = emit(v, program);
            program.push(match expr {
                Expr::Add(..) => Op::Add,
                Expr::Sub(..) => Op::Sub,
                Expr::Mul(..) => Op::Mul,
                Expr::Div(..) => Op::Div,
                _ => Op::Pow,
            });
            left.max(right + 1)
        }
    }
}
