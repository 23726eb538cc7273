//! Syntax types for the QASM 2.0 subset.
//!
//! Mainline statements are lowered into a circuit as they are parsed;
//! what lives here are the pieces that must be kept around: constant
//! expressions (evaluated against a parameter environment) and
//! user-defined gate bodies awaiting macro expansion at call sites.

use rustc_hash::FxHashMap;

use crate::error::{ParseError, ParseResult};

/// Binary operators in constant expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// A constant expression over numbers, `pi`, and gate parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal.
    Number(f64),
    /// The constant pi.
    Pi,
    /// A gate parameter, resolved at expansion time.
    Param(String),
    /// Unary negation.
    Neg(Box<Expr>),
    /// Binary operation.
    Binary(BinOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Evaluate against a parameter environment.
    pub fn eval(&self, env: &FxHashMap<String, f64>) -> ParseResult<f64> {
        match self {
            Expr::Number(v) => Ok(*v),
            Expr::Pi => Ok(std::f64::consts::PI),
            Expr::Param(name) => env
                .get(name)
                .copied()
                .ok_or_else(|| ParseError::UndefinedIdentifier(name.clone())),
            Expr::Neg(inner) => Ok(-inner.eval(env)?),
            Expr::Binary(op, lhs, rhs) => {
                let l = lhs.eval(env)?;
                let r = rhs.eval(env)?;
                Ok(match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => l / r,
                    BinOp::Pow => l.powf(r),
                })
            }
        }
    }
}

/// One statement inside a user-defined gate body.
#[derive(Debug, Clone)]
pub enum GateBodyStmt {
    /// A gate call over formal qubit names.
    Call {
        /// Gate name (standard or previously defined).
        name: String,
        /// Parameter expressions over the enclosing definition's params.
        params: Vec<Expr>,
        /// Formal qubit argument names.
        qubits: Vec<String>,
    },
    /// A barrier over formal qubit names.
    Barrier(Vec<String>),
}

/// A user-defined gate awaiting expansion.
#[derive(Debug, Clone)]
pub struct GateDef {
    /// Gate name.
    pub name: String,
    /// Formal parameter names.
    pub params: Vec<String>,
    /// Formal qubit argument names.
    pub qubits: Vec<String>,
    /// Body statements.
    pub body: Vec<GateBodyStmt>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_eval_constants() {
        let env = FxHashMap::default();
        assert_eq!(Expr::Number(1.5).eval(&env).unwrap(), 1.5);
        assert_eq!(Expr::Pi.eval(&env).unwrap(), PI);
    }

    #[test]
    fn test_eval_arithmetic() {
        let env = FxHashMap::default();
        // -pi/2
        let expr = Expr::Binary(
            BinOp::Div,
            Box::new(Expr::Neg(Box::new(Expr::Pi))),
            Box::new(Expr::Number(2.0)),
        );
        assert!((expr.eval(&env).unwrap() + PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_eval_param() {
        let mut env = FxHashMap::default();
        env.insert("theta".to_string(), 0.25);
        assert_eq!(Expr::Param("theta".into()).eval(&env).unwrap(), 0.25);
        assert!(Expr::Param("phi".into()).eval(&env).is_err());
    }
}
