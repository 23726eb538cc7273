//! Property-based tests for QASM 2.0 roundtrip conversion.
//!
//! Tests that circuit → QASM → circuit preserves structure and the
//! metrics the benchmark harness reads off the result.

use grani_ir::{Circuit, QubitId, StandardGate};
use grani_qasm::{emit, parse};
use proptest::prelude::*;

/// Gate operations that can be applied to a circuit.
#[derive(Debug, Clone)]
enum GateOp {
    H(u32),
    X(u32),
    T(u32),
    Rz(u32, f64),
    Cx(u32, u32),
    Cz(u32, u32),
    Cu1(u32, u32, f64),
}

impl GateOp {
    fn apply(self, circuit: &mut Circuit) {
        match self {
            GateOp::H(q) => {
                let _ = circuit.h(QubitId(q));
            }
            GateOp::X(q) => {
                let _ = circuit.x(QubitId(q));
            }
            GateOp::T(q) => {
                let _ = circuit.t(QubitId(q));
            }
            GateOp::Rz(q, theta) => {
                let _ = circuit.rz(theta, QubitId(q));
            }
            GateOp::Cx(q1, q2) => {
                if q1 != q2 {
                    let _ = circuit.cx(QubitId(q1), QubitId(q2));
                }
            }
            GateOp::Cz(q1, q2) => {
                if q1 != q2 {
                    let _ = circuit.cz(QubitId(q1), QubitId(q2));
                }
            }
            GateOp::Cu1(q1, q2, theta) => {
                if q1 != q2 {
                    let _ = circuit.gate(StandardGate::CU1(theta), [QubitId(q1), QubitId(q2)]);
                }
            }
        }
    }
}

fn arb_gate_op(num_qubits: u32) -> impl Strategy<Value = GateOp> {
    let angle = -10.0..10.0f64;
    if num_qubits < 2 {
        prop_oneof![
            (0..num_qubits).prop_map(GateOp::H),
            (0..num_qubits).prop_map(GateOp::X),
            (0..num_qubits).prop_map(GateOp::T),
            (0..num_qubits, angle).prop_map(|(q, a)| GateOp::Rz(q, a)),
        ]
        .boxed()
    } else {
        prop_oneof![
            (0..num_qubits).prop_map(GateOp::H),
            (0..num_qubits).prop_map(GateOp::X),
            (0..num_qubits).prop_map(GateOp::T),
            (0..num_qubits, angle.clone()).prop_map(|(q, a)| GateOp::Rz(q, a)),
            (0..num_qubits, 0..num_qubits).prop_map(|(a, b)| GateOp::Cx(a, b)),
            (0..num_qubits, 0..num_qubits).prop_map(|(a, b)| GateOp::Cz(a, b)),
            (0..num_qubits, 0..num_qubits, angle)
                .prop_map(|(a, b, t)| GateOp::Cu1(a, b, t)),
        ]
        .boxed()
    }
}

fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (1_u32..=6).prop_flat_map(|num_qubits| {
        prop::collection::vec(arb_gate_op(num_qubits), 1..=24).prop_map(move |ops| {
            let mut circuit = Circuit::with_size("test", num_qubits, num_qubits);
            for op in ops {
                op.apply(&mut circuit);
            }
            circuit
        })
    })
}

proptest! {
    #[test]
    fn roundtrip_preserves_structure(circuit in arb_circuit()) {
        let qasm = emit(&circuit).unwrap();
        let reparsed = parse(&qasm).unwrap();

        prop_assert_eq!(reparsed.num_qubits(), circuit.num_qubits());
        prop_assert_eq!(reparsed.dag().num_ops(), circuit.dag().num_ops());
        prop_assert_eq!(reparsed.depth(), circuit.depth());
        prop_assert_eq!(reparsed.two_qubit_depth(), circuit.two_qubit_depth());
        prop_assert_eq!(
            reparsed.dag().num_two_qubit_ops(),
            circuit.dag().num_two_qubit_ops()
        );
    }

    #[test]
    fn roundtrip_twice_is_stable(circuit in arb_circuit()) {
        // Topological tie-breaking may reorder independent statements,
        // so compare the statement multiset rather than exact text.
        let once = emit(&circuit).unwrap();
        let twice = emit(&parse(&once).unwrap()).unwrap();

        let mut once_lines: Vec<&str> = once.lines().collect();
        let mut twice_lines: Vec<&str> = twice.lines().collect();
        once_lines.sort_unstable();
        twice_lines.sort_unstable();
        prop_assert_eq!(once_lines, twice_lines);
    }
}
