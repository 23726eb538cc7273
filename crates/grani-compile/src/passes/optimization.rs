//! Peephole optimization passes.
//!
//! Both passes rebuild the DAG from a linear topological sweep. Angles
//! are concrete, so rotation merging is plain arithmetic.

use rustc_hash::FxHashMap;

use grani_ir::{CircuitDag, Instruction, InstructionKind, QubitId, StandardGate};

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Angles below this are treated as zero and dropped.
const ANGLE_EPSILON: f64 = 1e-12;

/// Merge runs of adjacent same-kind rotations on each wire.
///
/// `rz(a); rz(b)` becomes `rz(a+b)`; zero-angle results and identity
/// gates are dropped. Different rotation kinds are never mixed, even on
/// the same axis (rz and u1 differ by global phase bookkeeping).
pub struct Optimize1qGates;

impl Pass for Optimize1qGates {
    fn name(&self) -> &'static str {
        "Optimize1qGates"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, _properties: &mut PropertySet) -> CompileResult<()> {
        /// A rotation waiting to be merged with its successors.
        #[derive(Clone, Copy)]
        enum Pending {
            Rx(f64),
            Ry(f64),
            Rz(f64),
            U1(f64),
        }

        impl Pending {
            fn merge(&mut self, other: Pending) -> bool {
                match (self, other) {
                    (Pending::Rx(a), Pending::Rx(b)) => {
                        *a += b;
                        true
                    }
                    (Pending::Ry(a), Pending::Ry(b)) => {
                        *a += b;
                        true
                    }
                    (Pending::Rz(a), Pending::Rz(b)) => {
                        *a += b;
                        true
                    }
                    (Pending::U1(a), Pending::U1(b)) => {
                        *a += b;
                        true
                    }
                    _ => false,
                }
            }

            fn into_gate(self) -> Option<StandardGate> {
                let (angle, build): (f64, fn(f64) -> StandardGate) = match self {
                    Pending::Rx(a) => (a, StandardGate::Rx),
                    Pending::Ry(a) => (a, StandardGate::Ry),
                    Pending::Rz(a) => (a, StandardGate::Rz),
                    Pending::U1(a) => (a, StandardGate::U1),
                };
                (angle.abs() > ANGLE_EPSILON).then(|| build(angle))
            }
        }

        fn as_pending(gate: &StandardGate) -> Option<Pending> {
            match *gate {
                StandardGate::Rx(a) => Some(Pending::Rx(a)),
                StandardGate::Ry(a) => Some(Pending::Ry(a)),
                StandardGate::Rz(a) => Some(Pending::Rz(a)),
                StandardGate::U1(a) => Some(Pending::U1(a)),
                _ => None,
            }
        }

        let mut optimized = CircuitDag::new();
        for qubit in dag.qubits() {
            optimized.add_qubit(qubit);
        }
        for clbit in dag.clbits() {
            optimized.add_clbit(clbit);
        }

        let mut pending: FxHashMap<QubitId, Pending> = FxHashMap::default();

        let flush =
            |optimized: &mut CircuitDag, pending: &mut FxHashMap<QubitId, Pending>, qubit| {
                if let Some(p) = pending.remove(&qubit) {
                    if let Some(gate) = p.into_gate() {
                        optimized
                            .apply(Instruction::single_qubit_gate(gate, qubit))
                            .expect("flush reapplies a validated instruction");
                    }
                }
            };

        for (_, instruction) in dag.topological_ops() {
            // Bare identities vanish.
            if matches!(instruction.kind, InstructionKind::Gate(StandardGate::I)) {
                continue;
            }

            if let InstructionKind::Gate(gate) = &instruction.kind {
                if let Some(rotation) = as_pending(gate) {
                    let qubit = instruction.qubits[0];
                    let merged = pending
                        .get_mut(&qubit)
                        .is_some_and(|current| current.merge(rotation));
                    if !merged {
                        flush(&mut optimized, &mut pending, qubit);
                        pending.insert(qubit, rotation);
                    }
                    continue;
                }
            }

            // Anything else on a wire ends that wire's pending run.
            for &qubit in &instruction.qubits {
                flush(&mut optimized, &mut pending, qubit);
            }
            optimized.apply(instruction.clone())?;
        }

        // Flush leftovers in qubit order for determinism.
        let mut remaining: Vec<QubitId> = pending.keys().copied().collect();
        remaining.sort_by_key(|q| q.0);
        for qubit in remaining {
            flush(&mut optimized, &mut pending, qubit);
        }

        *dag = optimized;
        Ok(())
    }
}

/// Cancel adjacent self-inverse two-qubit gate pairs.
///
/// `cx(a,b); cx(a,b)` vanishes; CZ and SWAP additionally cancel with
/// reversed operands. A pair only cancels when nothing else touched
/// either operand in between.
pub struct CancelAdjacentGates;

impl Pass for CancelAdjacentGates {
    fn name(&self) -> &'static str {
        "CancelAdjacentGates"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, _properties: &mut PropertySet) -> CompileResult<()> {
        fn cancels(prev: &Instruction, next: &Instruction) -> bool {
            let (Some(g1), Some(g2)) = (prev.as_gate(), next.as_gate()) else {
                return false;
            };
            if g1 != g2 {
                return false;
            }
            match g1 {
                StandardGate::CX => prev.qubits == next.qubits,
                // Symmetric gates cancel regardless of operand order.
                StandardGate::CZ | StandardGate::Swap => {
                    prev.qubits == next.qubits
                        || (prev.qubits[0] == next.qubits[1] && prev.qubits[1] == next.qubits[0])
                }
                _ => false,
            }
        }

        let mut kept: Vec<Option<Instruction>> = Vec::with_capacity(dag.num_ops());
        let mut last_touch: FxHashMap<QubitId, usize> = FxHashMap::default();

        for (_, instruction) in dag.topological_ops() {
            if matches!(
                instruction.as_gate(),
                Some(StandardGate::CX | StandardGate::CZ | StandardGate::Swap)
            ) {
                let a = instruction.qubits[0];
                let b = instruction.qubits[1];
                if let (Some(&i), Some(&j)) = (last_touch.get(&a), last_touch.get(&b)) {
                    if i == j {
                        if let Some(prev) = &kept[i] {
                            if cancels(prev, instruction) {
                                kept[i] = None;
                                last_touch.remove(&a);
                                last_touch.remove(&b);
                                continue;
                            }
                        }
                    }
                }
            }

            kept.push(Some(instruction.clone()));
            let index = kept.len() - 1;
            for &qubit in &instruction.qubits {
                last_touch.insert(qubit, index);
            }
        }

        let mut cancelled = CircuitDag::new();
        for qubit in dag.qubits() {
            cancelled.add_qubit(qubit);
        }
        for clbit in dag.clbits() {
            cancelled.add_clbit(clbit);
        }
        for instruction in kept.into_iter().flatten() {
            cancelled.apply(instruction)?;
        }

        *dag = cancelled;
        Ok(())
    }
}
