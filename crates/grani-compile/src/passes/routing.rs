//! Routing pass: insert SWAP gates to satisfy connectivity constraints.

use tracing::debug;

use grani_ir::{CircuitDag, Instruction, StandardGate};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Number of SWAP gates inserted by routing, recorded as a custom
/// property for the harness's swap-count metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwapCount(pub usize);

/// Greedy shortest-path routing.
///
/// Rebuilds the circuit in topological order; whenever a two-qubit gate
/// spans physically disconnected qubits, SWAPs are inserted along a BFS
/// shortest path to bring the operands adjacent. Not optimal, but fast
/// and deterministic, which is what a baseline transpiler should be.
pub struct BasicRouting;

impl Pass for BasicRouting {
    fn name(&self) -> &'static str {
        "BasicRouting"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let coupling_map = properties
            .coupling_map
            .as_ref()
            .ok_or(CompileError::MissingCouplingMap)?;
        let layout = properties
            .layout
            .as_mut()
            .ok_or(CompileError::MissingLayout)?;

        let mut routed = CircuitDag::new();
        for qubit in dag.qubits() {
            routed.add_qubit(qubit);
        }
        for clbit in dag.clbits() {
            routed.add_clbit(clbit);
        }

        let mut swaps_inserted = 0usize;

        for (_, instruction) in dag.topological_ops() {
            if instruction.is_two_qubit_gate() {
                let q0 = instruction.qubits[0];
                let q1 = instruction.qubits[1];
                let p0 = layout.get_physical(q0).ok_or(CompileError::MissingLayout)?;
                let p1 = layout.get_physical(q1).ok_or(CompileError::MissingLayout)?;

                if !coupling_map.is_connected(p0, p1) {
                    let path = coupling_map
                        .shortest_path(p0, p1)
                        .ok_or(CompileError::RoutingFailed {
                            qubit1: p0,
                            qubit2: p1,
                        })?;

                    // Walk q0 along the path until it neighbors q1.
                    for hop in 0..path.len() - 2 {
                        let (near, far) = (path[hop], path[hop + 1]);
                        let l_near = layout.get_logical(near);
                        let l_far = layout.get_logical(far);

                        // A SWAP gate is only needed when both positions
                        // are occupied; moving into an empty position is
                        // a pure relabeling.
                        if let (Some(a), Some(b)) = (l_near, l_far) {
                            routed.apply(Instruction::two_qubit_gate(StandardGate::Swap, a, b))?;
                            swaps_inserted += 1;
                        }
                        layout.swap(near, far);
                    }
                }
            }

            routed.apply(instruction.clone())?;
        }

        debug!(swaps = swaps_inserted, "routing complete");
        *dag = routed;
        properties.insert(SwapCount(swaps_inserted));
        Ok(())
    }

    fn should_run(&self, _dag: &CircuitDag, properties: &PropertySet) -> bool {
        properties.coupling_map.is_some() && properties.layout.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::TrivialLayout;
    use crate::property::{BasisGates, CouplingMap};
    use grani_ir::{Circuit, QubitId};

    fn routed_dag(circuit: Circuit, coupling: CouplingMap) -> (CircuitDag, PropertySet) {
        let mut dag = circuit.into_dag();
        let mut props = PropertySet::new().with_target(coupling, BasisGates::universal());
        TrivialLayout.run(&mut dag, &mut props).unwrap();
        BasicRouting.run(&mut dag, &mut props).unwrap();
        (dag, props)
    }

    #[test]
    fn test_adjacent_gate_untouched() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();

        let (dag, props) = routed_dag(circuit, CouplingMap::linear(5));
        assert_eq!(dag.num_ops(), 2);
        assert_eq!(props.get::<SwapCount>(), Some(&SwapCount(0)));
    }

    #[test]
    fn test_distant_gate_gets_swaps() {
        let mut circuit = Circuit::with_size("test", 4, 0);
        circuit.cx(QubitId(0), QubitId(3)).unwrap();

        let (dag, props) = routed_dag(circuit, CouplingMap::linear(4));
        // Two SWAPs to bring q0 next to q3, then the CX.
        assert_eq!(dag.count_named("swap"), 2);
        assert_eq!(dag.count_named("cx"), 1);
        assert_eq!(props.get::<SwapCount>(), Some(&SwapCount(2)));
    }

    #[test]
    fn test_routed_gates_are_connected() {
        let mut circuit = Circuit::with_size("test", 4, 0);
        circuit.cx(QubitId(0), QubitId(3)).unwrap();
        circuit.cx(QubitId(0), QubitId(2)).unwrap();
        circuit.cx(QubitId(1), QubitId(3)).unwrap();

        let coupling = CouplingMap::linear(4);
        let (dag, props) = routed_dag(circuit, coupling.clone());

        // Replay the routed circuit against a fresh trivial layout:
        // every two-qubit gate must touch coupled physical qubits.
        let mut layout = crate::property::Layout::trivial(4);
        for (_, inst) in dag.topological_ops() {
            if inst.is_two_qubit_gate() {
                let p0 = layout.get_physical(inst.qubits[0]).unwrap();
                let p1 = layout.get_physical(inst.qubits[1]).unwrap();
                assert!(coupling.is_connected(p0, p1), "unrouted gate {inst:?}");
                if inst.name() == "swap" {
                    layout.swap(p0, p1);
                }
            }
        }
        let _ = props;
    }

    #[test]
    fn test_disconnected_device_fails() {
        let mut coupling = CouplingMap::new(4);
        coupling.add_edge(0, 1);
        coupling.add_edge(2, 3);

        let mut circuit = Circuit::with_size("test", 4, 0);
        circuit.cx(QubitId(0), QubitId(3)).unwrap();

        let mut dag = circuit.into_dag();
        let mut props = PropertySet::new().with_target(coupling, BasisGates::universal());
        TrivialLayout.run(&mut dag, &mut props).unwrap();
        let result = BasicRouting.run(&mut dag, &mut props);
        assert!(matches!(result, Err(CompileError::RoutingFailed { .. })));
    }
}
