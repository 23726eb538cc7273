//! `OpenQASM` 2.0 emitter.
//!
//! Writes a circuit back to QASM text, used by the CLI to save
//! transpiled output. Registers are emitted as declared; operations in
//! topological order.

use std::fmt::Write as _;

use grani_ir::{Circuit, ClbitId, InstructionKind, QubitId, StandardGate};

use crate::error::{ParseError, ParseResult};

/// Emit a circuit as `OpenQASM` 2.0 source.
pub fn emit(circuit: &Circuit) -> ParseResult<String> {
    let mut out = String::new();
    out.push_str("OPENQASM 2.0;\n");
    out.push_str("include \"qelib1.inc\";\n");

    for qreg in circuit.qregs() {
        let _ = writeln!(out, "qreg {}[{}];", qreg.name, qreg.size);
    }
    for creg in circuit.cregs() {
        let _ = writeln!(out, "creg {}[{}];", creg.name, creg.size);
    }

    for (_, inst) in circuit.dag().topological_ops() {
        match &inst.kind {
            InstructionKind::Gate(gate) => {
                emit_gate(&mut out, circuit, gate, &inst.qubits)?;
            }
            InstructionKind::Measure => {
                let q = qubit_ref(circuit, inst.qubits[0])?;
                let c = clbit_ref(circuit, inst.clbits[0])?;
                let _ = writeln!(out, "measure {q} -> {c};");
            }
            InstructionKind::Reset => {
                let q = qubit_ref(circuit, inst.qubits[0])?;
                let _ = writeln!(out, "reset {q};");
            }
            InstructionKind::Barrier => {
                let refs: Vec<String> = inst
                    .qubits
                    .iter()
                    .map(|&q| qubit_ref(circuit, q))
                    .collect::<ParseResult<_>>()?;
                let _ = writeln!(out, "barrier {};", refs.join(", "));
            }
        }
    }

    Ok(out)
}

fn emit_gate(
    out: &mut String,
    circuit: &Circuit,
    gate: &StandardGate,
    qubits: &[QubitId],
) -> ParseResult<()> {
    let refs: Vec<String> = qubits
        .iter()
        .map(|&q| qubit_ref(circuit, q))
        .collect::<ParseResult<_>>()?;

    let params = gate.params();
    if params.is_empty() {
        let _ = writeln!(out, "{} {};", gate.name(), refs.join(", "));
    } else {
        let rendered: Vec<String> = params.iter().map(|p| format_angle(*p)).collect();
        let _ = writeln!(
            out,
            "{}({}) {};",
            gate.name(),
            rendered.join(", "),
            refs.join(", ")
        );
    }
    Ok(())
}

/// Format an angle, preferring exact decimal round-trips.
fn format_angle(value: f64) -> String {
    // `{}` on f64 prints the shortest representation that parses back
    // to the same value, but bare integers would re-lex as IntLiteral;
    // that is fine for the parser, which accepts both.
    format!("{value}")
}

fn qubit_ref(circuit: &Circuit, qubit: QubitId) -> ParseResult<String> {
    for qreg in circuit.qregs() {
        if qubit.0 >= qreg.start.0 && qubit.0 < qreg.start.0 + qreg.size {
            return Ok(format!("{}[{}]", qreg.name, qubit.0 - qreg.start.0));
        }
    }
    Err(ParseError::UndefinedIdentifier(qubit.to_string()))
}

fn clbit_ref(circuit: &Circuit, clbit: ClbitId) -> ParseResult<String> {
    for creg in circuit.cregs() {
        if clbit.0 >= creg.start.0 && clbit.0 < creg.start.0 + creg.size {
            return Ok(format!("{}[{}]", creg.name, clbit.0 - creg.start.0));
        }
    }
    Err(ParseError::UndefinedIdentifier(clbit.to_string()))
}
