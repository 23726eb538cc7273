//! Parser for `OpenQASM` 2.0.
//!
//! Single-pass recursive descent: mainline statements are lowered into a
//! [`Circuit`] as they are parsed. User-defined `gate` blocks are stored
//! and macro-expanded into standard gates at each call site, so the
//! resulting circuit contains only the standard gate set.

use rustc_hash::FxHashMap;

use grani_ir::{Circuit, ClbitId, QubitId, StandardGate};

use crate::ast::{BinOp, Expr, GateBodyStmt, GateDef};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{SpannedToken, Token, tokenize};

/// Maximum nesting depth for user-defined gate expansion.
const MAX_EXPANSION_DEPTH: usize = 64;

/// Parse a QASM 2.0 source string into a [`Circuit`].
pub fn parse(source: &str) -> ParseResult<Circuit> {
    let mut parser = Parser::new(source)?;
    parser.parse_program()
}

/// A register reference in an operand position: `q` or `q[2]`.
#[derive(Debug, Clone)]
struct Operand {
    register: String,
    index: Option<usize>,
}

/// Parameter and qubit arity of a standard gate, for error reporting.
fn standard_arity(name: &str) -> Option<(usize, usize)> {
    let arity = match name {
        "id" | "x" | "y" | "z" | "h" | "s" | "sdg" | "t" | "tdg" | "sx" => (0, 1),
        "rx" | "ry" | "rz" | "u1" | "p" => (1, 1),
        "u2" => (2, 1),
        "u3" | "u" | "U" => (3, 1),
        "cx" | "CX" | "cy" | "cz" | "ch" | "swap" => (0, 2),
        "crx" | "cry" | "crz" | "cu1" | "cp" | "rzz" => (1, 2),
        "cu3" => (3, 2),
        "ccx" | "cswap" => (0, 3),
        _ => return None,
    };
    Some(arity)
}

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    qregs: FxHashMap<String, (QubitId, usize)>,
    cregs: FxHashMap<String, (ClbitId, usize)>,
    gate_defs: FxHashMap<String, GateDef>,
}

impl Parser {
    fn new(source: &str) -> ParseResult<Self> {
        let mut tokens = Vec::new();
        for result in tokenize(source) {
            match result {
                Ok(t) => tokens.push(t),
                Err((span, message)) => {
                    return Err(ParseError::LexerError {
                        position: span.start,
                        message,
                    });
                }
            }
        }
        Ok(Self {
            tokens,
            pos: 0,
            qregs: FxHashMap::default(),
            cregs: FxHashMap::default(),
            gate_defs: FxHashMap::default(),
        })
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos)?.token.clone();
        self.pos += 1;
        Some(token)
    }

    fn expect(&mut self, expected: &Token) -> ParseResult<()> {
        let found = self
            .advance()
            .ok_or_else(|| ParseError::UnexpectedEof(format!("expected {expected}")))?;
        if std::mem::discriminant(&found) != std::mem::discriminant(expected) {
            return Err(ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        Ok(())
    }

    fn consume(&mut self, token: &Token) -> bool {
        if self
            .peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
        {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_identifier(&mut self) -> ParseResult<String> {
        match self.advance() {
            Some(Token::Identifier(name)) => Ok(name),
            Some(other) => Err(ParseError::UnexpectedToken {
                expected: "identifier".into(),
                found: other.to_string(),
            }),
            None => Err(ParseError::UnexpectedEof("expected identifier".into())),
        }
    }

    fn expect_index(&mut self) -> ParseResult<usize> {
        self.expect(&Token::LBracket)?;
        let index = match self.advance() {
            Some(Token::IntLiteral(v)) => v as usize,
            Some(other) => {
                return Err(ParseError::UnexpectedToken {
                    expected: "integer index".into(),
                    found: other.to_string(),
                });
            }
            None => return Err(ParseError::UnexpectedEof("expected index".into())),
        };
        self.expect(&Token::RBracket)?;
        Ok(index)
    }

    // =========================================================================
    // Program structure
    // =========================================================================

    fn parse_program(&mut self) -> ParseResult<Circuit> {
        self.parse_header()?;
        let mut circuit = Circuit::new("main");

        while !self.is_eof() {
            self.parse_statement(&mut circuit)?;
        }

        Ok(circuit)
    }

    fn parse_header(&mut self) -> ParseResult<()> {
        self.expect(&Token::OpenQasm)?;
        match self.advance() {
            Some(Token::FloatLiteral(v)) if (v - 2.0).abs() < 1e-9 => {}
            Some(Token::FloatLiteral(v)) => {
                return Err(ParseError::InvalidVersion(v.to_string()));
            }
            Some(other) => {
                return Err(ParseError::UnexpectedToken {
                    expected: "version number".into(),
                    found: other.to_string(),
                });
            }
            None => return Err(ParseError::UnexpectedEof("expected version".into())),
        }
        self.expect(&Token::Semicolon)
    }

    fn parse_statement(&mut self, circuit: &mut Circuit) -> ParseResult<()> {
        match self.peek() {
            Some(Token::Include) => self.parse_include(),
            Some(Token::Qreg) => self.parse_qreg(circuit),
            Some(Token::Creg) => self.parse_creg(circuit),
            Some(Token::Gate) => self.parse_gate_def(),
            Some(Token::Opaque) => Err(ParseError::Unsupported(
                "opaque gate declarations".into(),
            )),
            Some(Token::If) => Err(ParseError::Unsupported(
                "classically conditioned operations".into(),
            )),
            Some(Token::Measure) => self.parse_measure(circuit),
            Some(Token::Reset) => self.parse_reset(circuit),
            Some(Token::Barrier) => self.parse_barrier(circuit),
            Some(Token::Identifier(_) | Token::GateU | Token::GateCX) => {
                self.parse_gate_call(circuit)
            }
            Some(other) => Err(ParseError::UnexpectedToken {
                expected: "statement".into(),
                found: other.to_string(),
            }),
            None => Err(ParseError::UnexpectedEof("expected statement".into())),
        }
    }

    fn parse_include(&mut self) -> ParseResult<()> {
        self.expect(&Token::Include)?;
        let file = match self.advance() {
            Some(Token::StringLiteral(s)) => s,
            Some(other) => {
                return Err(ParseError::UnexpectedToken {
                    expected: "string literal".into(),
                    found: other.to_string(),
                });
            }
            None => return Err(ParseError::UnexpectedEof("expected include file".into())),
        };
        self.expect(&Token::Semicolon)?;

        // The standard prelude is built in; anything else would need
        // file resolution the benchmark corpus does not use.
        if file == "qelib1.inc" {
            Ok(())
        } else {
            Err(ParseError::Unsupported(format!("include \"{file}\"")))
        }
    }

    fn parse_qreg(&mut self, circuit: &mut Circuit) -> ParseResult<()> {
        self.expect(&Token::Qreg)?;
        let name = self.expect_identifier()?;
        let size = self.expect_index()?;
        self.expect(&Token::Semicolon)?;

        if size == 0 {
            return Err(ParseError::EmptyRegister(name));
        }
        if self.qregs.contains_key(&name) || self.cregs.contains_key(&name) {
            return Err(ParseError::DuplicateDeclaration(name));
        }
        let ids = circuit.add_qreg(&name, size as u32);
        self.qregs.insert(name, (ids[0], size));
        Ok(())
    }

    fn parse_creg(&mut self, circuit: &mut Circuit) -> ParseResult<()> {
        self.expect(&Token::Creg)?;
        let name = self.expect_identifier()?;
        let size = self.expect_index()?;
        self.expect(&Token::Semicolon)?;

        if size == 0 {
            return Err(ParseError::EmptyRegister(name));
        }
        if self.qregs.contains_key(&name) || self.cregs.contains_key(&name) {
            return Err(ParseError::DuplicateDeclaration(name));
        }
        let ids = circuit.add_creg(&name, size as u32);
        self.cregs.insert(name, (ids[0], size));
        Ok(())
    }

    // =========================================================================
    // Gate definitions
    // =========================================================================

    fn parse_gate_def(&mut self) -> ParseResult<()> {
        self.expect(&Token::Gate)?;
        let name = self.expect_identifier()?;

        if self.gate_defs.contains_key(&name) || standard_arity(&name).is_some() {
            return Err(ParseError::DuplicateDeclaration(name));
        }

        let mut params = vec![];
        if self.consume(&Token::LParen) {
            if !self.consume(&Token::RParen) {
                loop {
                    params.push(self.expect_identifier()?);
                    if !self.consume(&Token::Comma) {
                        break;
                    }
                }
                self.expect(&Token::RParen)?;
            }
        }

        let mut qubits = vec![];
        loop {
            qubits.push(self.expect_identifier()?);
            if !self.consume(&Token::Comma) {
                break;
            }
        }

        self.expect(&Token::LBrace)?;
        let mut body = vec![];
        while !self.consume(&Token::RBrace) {
            body.push(self.parse_gate_body_stmt()?);
        }

        self.gate_defs.insert(
            name.clone(),
            GateDef {
                name,
                params,
                qubits,
                body,
            },
        );
        Ok(())
    }

    fn parse_gate_body_stmt(&mut self) -> ParseResult<GateBodyStmt> {
        if self.consume(&Token::Barrier) {
            let mut qubits = vec![];
            loop {
                qubits.push(self.expect_identifier()?);
                if !self.consume(&Token::Comma) {
                    break;
                }
            }
            self.expect(&Token::Semicolon)?;
            return Ok(GateBodyStmt::Barrier(qubits));
        }

        let name = match self.advance() {
            Some(Token::Identifier(name)) => name,
            Some(Token::GateU) => "U".to_string(),
            Some(Token::GateCX) => "CX".to_string(),
            Some(other) => {
                return Err(ParseError::UnexpectedToken {
                    expected: "gate call".into(),
                    found: other.to_string(),
                });
            }
            None => return Err(ParseError::UnexpectedEof("expected gate call".into())),
        };

        let mut params = vec![];
        if self.consume(&Token::LParen) {
            if !self.consume(&Token::RParen) {
                loop {
                    params.push(self.parse_expr()?);
                    if !self.consume(&Token::Comma) {
                        break;
                    }
                }
                self.expect(&Token::RParen)?;
            }
        }

        let mut qubits = vec![];
        loop {
            qubits.push(self.expect_identifier()?);
            if !self.consume(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::Semicolon)?;

        Ok(GateBodyStmt::Call {
            name,
            params,
            qubits,
        })
    }

    // =========================================================================
    // Mainline operations
    // =========================================================================

    fn parse_operand(&mut self) -> ParseResult<Operand> {
        let register = self.expect_identifier()?;
        let index = if matches!(self.peek(), Some(Token::LBracket)) {
            Some(self.expect_index()?)
        } else {
            None
        };
        Ok(Operand { register, index })
    }

    /// Resolve a quantum operand to the qubits it addresses.
    fn resolve_qubits(&self, operand: &Operand) -> ParseResult<Vec<QubitId>> {
        let &(start, size) = self
            .qregs
            .get(&operand.register)
            .ok_or_else(|| ParseError::UndefinedIdentifier(operand.register.clone()))?;
        match operand.index {
            Some(index) => {
                if index >= size {
                    return Err(ParseError::IndexOutOfBounds {
                        register: operand.register.clone(),
                        index,
                        size,
                    });
                }
                Ok(vec![QubitId(start.0 + index as u32)])
            }
            None => Ok((0..size as u32).map(|i| QubitId(start.0 + i)).collect()),
        }
    }

    fn resolve_clbits(&self, operand: &Operand) -> ParseResult<Vec<ClbitId>> {
        let &(start, size) = self
            .cregs
            .get(&operand.register)
            .ok_or_else(|| ParseError::UndefinedIdentifier(operand.register.clone()))?;
        match operand.index {
            Some(index) => {
                if index >= size {
                    return Err(ParseError::IndexOutOfBounds {
                        register: operand.register.clone(),
                        index,
                        size,
                    });
                }
                Ok(vec![ClbitId(start.0 + index as u32)])
            }
            None => Ok((0..size as u32).map(|i| ClbitId(start.0 + i)).collect()),
        }
    }

    fn parse_measure(&mut self, circuit: &mut Circuit) -> ParseResult<()> {
        self.expect(&Token::Measure)?;
        let src = self.parse_operand()?;
        self.expect(&Token::Arrow)?;
        let dst = self.parse_operand()?;
        self.expect(&Token::Semicolon)?;

        let qubits = self.resolve_qubits(&src)?;
        let clbits = self.resolve_clbits(&dst)?;
        if qubits.len() != clbits.len() {
            return Err(ParseError::BroadcastMismatch {
                left: src.register,
                left_size: qubits.len(),
                right: dst.register,
                right_size: clbits.len(),
            });
        }
        for (q, c) in qubits.into_iter().zip(clbits) {
            circuit.measure(q, c)?;
        }
        Ok(())
    }

    fn parse_reset(&mut self, circuit: &mut Circuit) -> ParseResult<()> {
        self.expect(&Token::Reset)?;
        let operand = self.parse_operand()?;
        self.expect(&Token::Semicolon)?;
        for q in self.resolve_qubits(&operand)? {
            circuit.reset(q)?;
        }
        Ok(())
    }

    fn parse_barrier(&mut self, circuit: &mut Circuit) -> ParseResult<()> {
        self.expect(&Token::Barrier)?;
        let mut qubits = vec![];
        loop {
            let operand = self.parse_operand()?;
            qubits.extend(self.resolve_qubits(&operand)?);
            if !self.consume(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::Semicolon)?;
        circuit.barrier(qubits)?;
        Ok(())
    }

    fn parse_gate_call(&mut self, circuit: &mut Circuit) -> ParseResult<()> {
        let name = match self.advance() {
            Some(Token::Identifier(name)) => name,
            Some(Token::GateU) => "U".to_string(),
            Some(Token::GateCX) => "CX".to_string(),
            _ => unreachable!("caller checked the token"),
        };

        let mut params = vec![];
        if self.consume(&Token::LParen) {
            if !self.consume(&Token::RParen) {
                loop {
                    params.push(self.parse_expr()?);
                    if !self.consume(&Token::Comma) {
                        break;
                    }
                }
                self.expect(&Token::RParen)?;
            }
        }

        let mut operands = vec![];
        loop {
            operands.push(self.parse_operand()?);
            if !self.consume(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::Semicolon)?;

        // Angles in mainline calls contain no free parameters.
        let env = FxHashMap::default();
        let values: Vec<f64> = params
            .iter()
            .map(|e| e.eval(&env))
            .collect::<ParseResult<_>>()?;

        // QASM 2.0 broadcast: full-register operands repeat the gate
        // across the register; all registers involved must agree on size.
        let resolved: Vec<Vec<QubitId>> = operands
            .iter()
            .map(|op| self.resolve_qubits(op))
            .collect::<ParseResult<_>>()?;

        let broadcast = resolved
            .iter()
            .zip(&operands)
            .filter(|(_, op)| op.index.is_none())
            .map(|(qubits, _)| qubits.len())
            .max()
            .unwrap_or(1);

        for (qubits, op) in resolved.iter().zip(&operands) {
            if op.index.is_none() && qubits.len() != broadcast {
                return Err(ParseError::BroadcastMismatch {
                    left: operands[0].register.clone(),
                    left_size: broadcast,
                    right: op.register.clone(),
                    right_size: qubits.len(),
                });
            }
        }

        for i in 0..broadcast {
            let args: Vec<QubitId> = resolved
                .iter()
                .map(|qubits| if qubits.len() == 1 { qubits[0] } else { qubits[i] })
                .collect();
            self.apply_call(circuit, &name, &values, &args, 0)?;
        }

        Ok(())
    }

    /// Apply a gate call: a standard gate directly, or a user-defined
    /// gate expanded recursively into its body.
    fn apply_call(
        &self,
        circuit: &mut Circuit,
        name: &str,
        params: &[f64],
        qubits: &[QubitId],
        depth: usize,
    ) -> ParseResult<()> {
        if depth > MAX_EXPANSION_DEPTH {
            return Err(ParseError::ExpansionTooDeep(name.to_string()));
        }

        if let Some(def) = self.gate_defs.get(name) {
            if params.len() != def.params.len() {
                return Err(ParseError::WrongParameterCount {
                    gate: name.to_string(),
                    expected: def.params.len(),
                    got: params.len(),
                });
            }
            if qubits.len() != def.qubits.len() {
                return Err(ParseError::WrongQubitCount {
                    gate: name.to_string(),
                    expected: def.qubits.len(),
                    got: qubits.len(),
                });
            }

            let env: FxHashMap<String, f64> = def
                .params
                .iter()
                .cloned()
                .zip(params.iter().copied())
                .collect();
            let bindings: FxHashMap<&str, QubitId> = def
                .qubits
                .iter()
                .map(String::as_str)
                .zip(qubits.iter().copied())
                .collect();

            for stmt in &def.body {
                match stmt {
                    GateBodyStmt::Call {
                        name: inner,
                        params: exprs,
                        qubits: formals,
                    } => {
                        let values: Vec<f64> = exprs
                            .iter()
                            .map(|e| e.eval(&env))
                            .collect::<ParseResult<_>>()?;
                        let args: Vec<QubitId> = formals
                            .iter()
                            .map(|f| {
                                bindings.get(f.as_str()).copied().ok_or_else(|| {
                                    ParseError::UndefinedIdentifier(f.clone())
                                })
                            })
                            .collect::<ParseResult<_>>()?;
                        self.apply_call(circuit, inner, &values, &args, depth + 1)?;
                    }
                    GateBodyStmt::Barrier(formals) => {
                        let args: Vec<QubitId> = formals
                            .iter()
                            .map(|f| {
                                bindings.get(f.as_str()).copied().ok_or_else(|| {
                                    ParseError::UndefinedIdentifier(f.clone())
                                })
                            })
                            .collect::<ParseResult<_>>()?;
                        circuit.barrier(args)?;
                    }
                }
            }
            return Ok(());
        }

        match StandardGate::from_name(name, params) {
            Some(gate) => {
                if gate.num_qubits() as usize != qubits.len() {
                    return Err(ParseError::WrongQubitCount {
                        gate: name.to_string(),
                        expected: gate.num_qubits() as usize,
                        got: qubits.len(),
                    });
                }
                circuit.gate(gate, qubits.iter().copied())?;
                Ok(())
            }
            None => match standard_arity(name) {
                Some((expected_params, _)) => Err(ParseError::WrongParameterCount {
                    gate: name.to_string(),
                    expected: expected_params,
                    got: params.len(),
                }),
                None => Err(ParseError::UnknownGate(name.to_string())),
            },
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_additive()
    }

    fn parse_additive(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_multiplicative()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        if self.consume(&Token::Minus) {
            return Ok(Expr::Neg(Box::new(self.parse_unary()?)));
        }
        self.parse_power()
    }

    fn parse_power(&mut self) -> ParseResult<Expr> {
        let base = self.parse_primary()?;
        if self.consume(&Token::Caret) {
            // Right-associative
            let exponent = self.parse_unary()?;
            return Ok(Expr::Binary(
                BinOp::Pow,
                Box::new(base),
                Box::new(exponent),
            ));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        match self.advance() {
            Some(Token::FloatLiteral(v)) => Ok(Expr::Number(v)),
            Some(Token::IntLiteral(v)) => Ok(Expr::Number(v as f64)),
            Some(Token::Pi) => Ok(Expr::Pi),
            Some(Token::Identifier(name)) => Ok(Expr::Param(name)),
            Some(Token::LParen) => {
                let inner = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Some(other) => Err(ParseError::UnexpectedToken {
                expected: "expression".into(),
                found: other.to_string(),
            }),
            None => Err(ParseError::UnexpectedEof("expected expression".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_parse_bell() {
        let source = r#"
            OPENQASM 2.0;
            include "qelib1.inc";
            qreg q[2];
            creg c[2];
            h q[0];
            cx q[0], q[1];
            measure q[0] -> c[0];
            measure q[1] -> c[1];
        "#;
        let circuit = parse(source).unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_clbits(), 2);
        assert_eq!(circuit.dag().count_named("cx"), 1);
        assert_eq!(circuit.depth(), 3);
    }

    #[test]
    fn test_parse_parameterized() {
        let source = r#"
            OPENQASM 2.0;
            qreg q[1];
            rx(pi/2) q[0];
            u3(0.5, -pi/4, pi) q[0];
        "#;
        let circuit = parse(source).unwrap();
        let ops: Vec<_> = circuit
            .dag()
            .topological_ops()
            .map(|(_, inst)| inst.clone())
            .collect();
        assert_eq!(ops[0].as_gate(), Some(&StandardGate::Rx(PI / 2.0)));
        assert_eq!(
            ops[1].as_gate(),
            Some(&StandardGate::U3(0.5, -PI / 4.0, PI))
        );
    }

    #[test]
    fn test_parse_broadcast() {
        let source = r#"
            OPENQASM 2.0;
            qreg q[3];
            creg c[3];
            h q;
            measure q -> c;
        "#;
        let circuit = parse(source).unwrap();
        assert_eq!(circuit.dag().count_named("h"), 3);
        assert_eq!(circuit.dag().count_named("measure"), 3);
    }

    #[test]
    fn test_parse_gate_definition() {
        // majority/unmaj style definition from the adder benchmark
        let source = r#"
            OPENQASM 2.0;
            include "qelib1.inc";
            gate majority a,b,c {
                cx c,b;
                cx c,a;
                ccx a,b,c;
            }
            qreg q[3];
            majority q[0], q[1], q[2];
        "#;
        let circuit = parse(source).unwrap();
        assert_eq!(circuit.dag().count_named("cx"), 2);
        assert_eq!(circuit.dag().count_named("ccx"), 1);
    }

    #[test]
    fn test_parse_parameterized_gate_definition() {
        let source = r#"
            OPENQASM 2.0;
            gate rot(theta) a {
                rz(theta/2) a;
                rz(theta/2) a;
            }
            qreg q[1];
            rot(pi) q[0];
        "#;
        let circuit = parse(source).unwrap();
        let ops: Vec<_> = circuit
            .dag()
            .topological_ops()
            .map(|(_, inst)| inst.clone())
            .collect();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].as_gate(), Some(&StandardGate::Rz(PI / 2.0)));
    }

    #[test]
    fn test_builtin_u_and_cx() {
        let source = r#"
            OPENQASM 2.0;
            qreg q[2];
            U(0, 0, pi) q[0];
            CX q[0], q[1];
        "#;
        let circuit = parse(source).unwrap();
        assert_eq!(circuit.dag().count_named("u3"), 1);
        assert_eq!(circuit.dag().count_named("cx"), 1);
    }

    #[test]
    fn test_error_unknown_gate() {
        let source = "OPENQASM 2.0;\nqreg q[1];\nfrobnicate q[0];";
        assert!(matches!(parse(source), Err(ParseError::UnknownGate(_))));
    }

    #[test]
    fn test_error_index_out_of_bounds() {
        let source = "OPENQASM 2.0;\nqreg q[2];\nh q[5];";
        assert!(matches!(
            parse(source),
            Err(ParseError::IndexOutOfBounds { index: 5, size: 2, .. })
        ));
    }

    #[test]
    fn test_error_wrong_version() {
        let source = "OPENQASM 3.0;\n";
        assert!(matches!(parse(source), Err(ParseError::InvalidVersion(_))));
    }

    #[test]
    fn test_error_conditional_rejected() {
        let source = "OPENQASM 2.0;\nqreg q[1];\ncreg c[1];\nif (c==1) x q[0];";
        assert!(matches!(parse(source), Err(ParseError::Unsupported(_))));
    }

    #[test]
    fn test_error_empty_register() {
        let source = "OPENQASM 2.0;\nqreg q[0];";
        assert!(matches!(parse(source), Err(ParseError::EmptyRegister(_))));
    }

    #[test]
    fn test_error_duplicate_register() {
        let source = "OPENQASM 2.0;\nqreg q[1];\ncreg q[1];";
        assert!(matches!(
            parse(source),
            Err(ParseError::DuplicateDeclaration(_))
        ));
    }

    #[test]
    fn test_broadcast_mismatch() {
        let source = "OPENQASM 2.0;\nqreg a[2];\nqreg b[3];\ncx a, b;";
        assert!(matches!(
            parse(source),
            Err(ParseError::BroadcastMismatch { .. })
        ));
    }
}
