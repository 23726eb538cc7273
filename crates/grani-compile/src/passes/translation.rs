//! Basis translation pass: decompose gates into the target gate set.
//!
//! Decomposition rules follow the `qelib1.inc` definitions, lowered
//! toward the CX + U family and from there to RZ/SX/X where a target
//! requires it. Rules are applied recursively until every gate name is
//! native to the target basis.

use std::f64::consts::PI;

use grani_ir::{CircuitDag, Instruction, InstructionKind, QubitId, StandardGate};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::{BasisGates, PropertySet};

/// Recursion guard: every rule strictly lowers toward the basis, so a
/// deeper chain means a rule cycle (e.g. a basis with neither rz nor u1).
const MAX_DECOMPOSE_DEPTH: usize = 16;

/// Basis translation pass.
pub struct BasisTranslation;

impl Pass for BasisTranslation {
    fn name(&self) -> &'static str {
        "BasisTranslation"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let basis = properties
            .basis_gates
            .as_ref()
            .ok_or(CompileError::MissingBasisGates)?
            .clone();

        let mut translated = CircuitDag::new();
        for qubit in dag.qubits() {
            translated.add_qubit(qubit);
        }
        for clbit in dag.clbits() {
            translated.add_clbit(clbit);
        }

        for (_, instruction) in dag.topological_ops() {
            match &instruction.kind {
                InstructionKind::Gate(gate) => {
                    emit_in_basis(&mut translated, *gate, &instruction.qubits, &basis, 0)?;
                }
                _ => {
                    translated.apply(instruction.clone())?;
                }
            }
        }

        *dag = translated;
        Ok(())
    }

    fn should_run(&self, _dag: &CircuitDag, properties: &PropertySet) -> bool {
        properties.basis_gates.is_some()
    }
}

fn emit_in_basis(
    dag: &mut CircuitDag,
    gate: StandardGate,
    qubits: &[QubitId],
    basis: &BasisGates,
    depth: usize,
) -> CompileResult<()> {
    if basis.contains(gate.name()) {
        dag.apply(Instruction::gate(gate, qubits.iter().copied()))?;
        return Ok(());
    }
    if depth > MAX_DECOMPOSE_DEPTH {
        return Err(CompileError::TranslationFailed {
            gate: gate.name().to_string(),
        });
    }

    let replacement =
        decompose(gate, qubits, basis).ok_or_else(|| CompileError::TranslationFailed {
            gate: gate.name().to_string(),
        })?;

    for (sub_gate, sub_qubits) in replacement {
        emit_in_basis(dag, sub_gate, &sub_qubits, basis, depth + 1)?;
    }
    Ok(())
}

/// One decomposition step for a gate outside the basis.
///
/// Returns the replacement sequence in application order, or `None` if
/// no rule applies.
#[allow(clippy::too_many_lines)]
fn decompose(
    gate: StandardGate,
    q: &[QubitId],
    basis: &BasisGates,
) -> Option<Vec<(StandardGate, Vec<QubitId>)>> {
    use StandardGate as G;

    let seq: Vec<(G, Vec<QubitId>)> = match gate {
        // Identity outside the basis simply vanishes.
        G::I => vec![],

        // Single-qubit gates lower to the U family.
        G::X => vec![(G::U3(PI, 0.0, PI), vec![q[0]])],
        G::Y => vec![(G::U3(PI, PI / 2.0, PI / 2.0), vec![q[0]])],
        G::Z => vec![(G::U1(PI), vec![q[0]])],
        G::H => vec![(G::U2(0.0, PI), vec![q[0]])],
        G::S => vec![(G::U1(PI / 2.0), vec![q[0]])],
        G::Sdg => vec![(G::U1(-PI / 2.0), vec![q[0]])],
        G::T => vec![(G::U1(PI / 4.0), vec![q[0]])],
        G::Tdg => vec![(G::U1(-PI / 4.0), vec![q[0]])],
        G::SX => vec![(G::U3(PI / 2.0, -PI / 2.0, PI / 2.0), vec![q[0]])],
        G::Rx(theta) => vec![(G::U3(theta, -PI / 2.0, PI / 2.0), vec![q[0]])],
        G::Ry(theta) => vec![(G::U3(theta, 0.0, 0.0), vec![q[0]])],
        G::Rz(theta) => vec![(G::U1(theta), vec![q[0]])],
        G::U1(lambda) => vec![(G::Rz(lambda), vec![q[0]])],
        G::U2(phi, lambda) => vec![(G::U3(PI / 2.0, phi, lambda), vec![q[0]])],
        // ZSXZSX rewrite, the standard lowering onto RZ + SX targets.
        G::U3(theta, phi, lambda) => vec![
            (G::Rz(lambda), vec![q[0]]),
            (G::SX, vec![q[0]]),
            (G::Rz(theta + PI), vec![q[0]]),
            (G::SX, vec![q[0]]),
            (G::Rz(phi + PI), vec![q[0]]),
        ],

        // Entangler exchange: whichever of CX/CZ the target carries.
        G::CX => {
            if basis.contains("cz") {
                vec![
                    (G::H, vec![q[1]]),
                    (G::CZ, vec![q[0], q[1]]),
                    (G::H, vec![q[1]]),
                ]
            } else {
                return None;
            }
        }
        G::CZ => {
            if basis.contains("cx") {
                vec![
                    (G::H, vec![q[1]]),
                    (G::CX, vec![q[0], q[1]]),
                    (G::H, vec![q[1]]),
                ]
            } else {
                return None;
            }
        }

        G::CY => vec![
            (G::Sdg, vec![q[1]]),
            (G::CX, vec![q[0], q[1]]),
            (G::S, vec![q[1]]),
        ],
        G::CH => vec![
            (G::S, vec![q[1]]),
            (G::H, vec![q[1]]),
            (G::T, vec![q[1]]),
            (G::CX, vec![q[0], q[1]]),
            (G::Tdg, vec![q[1]]),
            (G::H, vec![q[1]]),
            (G::Sdg, vec![q[1]]),
        ],
        G::Swap => vec![
            (G::CX, vec![q[0], q[1]]),
            (G::CX, vec![q[1], q[0]]),
            (G::CX, vec![q[0], q[1]]),
        ],
        G::CRx(lambda) => vec![
            (G::U1(PI / 2.0), vec![q[1]]),
            (G::CX, vec![q[0], q[1]]),
            (G::U3(-lambda / 2.0, 0.0, 0.0), vec![q[1]]),
            (G::CX, vec![q[0], q[1]]),
            (G::U3(lambda / 2.0, -PI / 2.0, 0.0), vec![q[1]]),
        ],
        G::CRy(lambda) => vec![
            (G::U3(lambda / 2.0, 0.0, 0.0), vec![q[1]]),
            (G::CX, vec![q[0], q[1]]),
            (G::U3(-lambda / 2.0, 0.0, 0.0), vec![q[1]]),
            (G::CX, vec![q[0], q[1]]),
        ],
        G::CRz(lambda) => vec![
            (G::U1(lambda / 2.0), vec![q[1]]),
            (G::CX, vec![q[0], q[1]]),
            (G::U1(-lambda / 2.0), vec![q[1]]),
            (G::CX, vec![q[0], q[1]]),
        ],
        G::CU1(lambda) => vec![
            (G::U1(lambda / 2.0), vec![q[0]]),
            (G::CX, vec![q[0], q[1]]),
            (G::U1(-lambda / 2.0), vec![q[1]]),
            (G::CX, vec![q[0], q[1]]),
            (G::U1(lambda / 2.0), vec![q[1]]),
        ],
        G::CU3(theta, phi, lambda) => vec![
            (G::U1((lambda + phi) / 2.0), vec![q[0]]),
            (G::U1((lambda - phi) / 2.0), vec![q[1]]),
            (G::CX, vec![q[0], q[1]]),
            (G::U3(-theta / 2.0, 0.0, -(phi + lambda) / 2.0), vec![q[1]]),
            (G::CX, vec![q[0], q[1]]),
            (G::U3(theta / 2.0, phi, 0.0), vec![q[1]]),
        ],
        G::RZZ(theta) => vec![
            (G::CX, vec![q[0], q[1]]),
            (G::U1(theta), vec![q[1]]),
            (G::CX, vec![q[0], q[1]]),
        ],

        // qelib1 Toffoli over CX + T.
        G::CCX => vec![
            (G::H, vec![q[2]]),
            (G::CX, vec![q[1], q[2]]),
            (G::Tdg, vec![q[2]]),
            (G::CX, vec![q[0], q[2]]),
            (G::T, vec![q[2]]),
            (G::CX, vec![q[1], q[2]]),
            (G::Tdg, vec![q[2]]),
            (G::CX, vec![q[0], q[2]]),
            (G::T, vec![q[1]]),
            (G::T, vec![q[2]]),
            (G::H, vec![q[2]]),
            (G::CX, vec![q[0], q[1]]),
            (G::T, vec![q[0]]),
            (G::Tdg, vec![q[1]]),
            (G::CX, vec![q[0], q[1]]),
        ],
        G::CSwap => vec![
            (G::CX, vec![q[2], q[1]]),
            (G::CCX, vec![q[0], q[1], q[2]]),
            (G::CX, vec![q[2], q[1]]),
        ],
    };

    Some(seq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grani_ir::Circuit;

    fn translate(circuit: Circuit, basis: BasisGates) -> CircuitDag {
        let mut dag = circuit.into_dag();
        let mut props = PropertySet::new();
        props.basis_gates = Some(basis);
        BasisTranslation.run(&mut dag, &mut props).unwrap();
        dag
    }

    fn assert_all_in_basis(dag: &CircuitDag, basis: &BasisGates) {
        for (_, inst) in dag.topological_ops() {
            assert!(
                basis.contains(inst.name()),
                "gate '{}' left outside basis",
                inst.name()
            );
        }
    }

    #[test]
    fn test_native_gates_untouched() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();

        let dag = translate(circuit, BasisGates::universal());
        assert_eq!(dag.num_ops(), 2);
    }

    #[test]
    fn test_h_to_ibm_basis() {
        let mut circuit = Circuit::with_size("test", 1, 0);
        circuit.h(QubitId(0)).unwrap();

        let basis = BasisGates::ibm();
        let dag = translate(circuit, basis.clone());
        assert_all_in_basis(&dag, &basis);
        assert!(dag.count_named("sx") > 0);
    }

    #[test]
    fn test_swap_to_ibm_basis() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        circuit.swap(QubitId(0), QubitId(1)).unwrap();

        let basis = BasisGates::ibm();
        let dag = translate(circuit, basis.clone());
        assert_all_in_basis(&dag, &basis);
        assert_eq!(dag.count_named("cx"), 3);
    }

    #[test]
    fn test_cx_to_cz_basis() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        circuit.cx(QubitId(0), QubitId(1)).unwrap();

        let basis = BasisGates::cz_based();
        let dag = translate(circuit, basis.clone());
        assert_all_in_basis(&dag, &basis);
        assert_eq!(dag.count_named("cz"), 1);
    }

    #[test]
    fn test_ccx_expansion() {
        let mut circuit = Circuit::with_size("test", 3, 0);
        circuit.ccx(QubitId(0), QubitId(1), QubitId(2)).unwrap();

        let basis = BasisGates::ibm();
        let dag = translate(circuit, basis.clone());
        assert_all_in_basis(&dag, &basis);
        assert_eq!(dag.count_named("cx"), 6);
    }

    #[test]
    fn test_measure_passes_through() {
        let circuit = Circuit::bell().unwrap();
        let basis = BasisGates::ibm();
        let dag = translate(circuit, basis.clone());
        assert_all_in_basis(&dag, &basis);
        assert_eq!(dag.count_named("measure"), 2);
    }

    #[test]
    fn test_untranslatable_basis_errors() {
        // A basis with no phase gate at all cannot absorb an rz chain.
        let mut circuit = Circuit::with_size("test", 1, 0);
        circuit.rz(0.5, QubitId(0)).unwrap();

        let mut dag = circuit.into_dag();
        let mut props = PropertySet::new();
        props.basis_gates = Some(BasisGates::new(["cx", "sx", "x"]));
        let result = BasisTranslation.run(&mut dag, &mut props);
        assert!(matches!(
            result,
            Err(CompileError::TranslationFailed { .. })
        ));
    }
}
