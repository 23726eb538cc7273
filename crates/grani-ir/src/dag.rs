//! DAG-based circuit representation.
//!
//! Nodes are wire inputs, wire outputs, or operations; edges carry the
//! wire (quantum or classical) they belong to. Every wire forms a single
//! path from its In node to its Out node, threading through each
//! operation that touches it in program order.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::bit::{ClbitId, QubitId};
use crate::error::{IrError, IrResult};
use crate::instruction::{Instruction, InstructionKind};

/// Node index type for the circuit DAG.
pub type NodeIndex = PetNodeIndex<u32>;

/// A node in the circuit DAG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DagNode {
    /// Input node for a wire.
    In(WireId),
    /// Output node for a wire.
    Out(WireId),
    /// Operation node containing an instruction.
    Op(Instruction),
}

impl DagNode {
    /// Check if this is an operation node.
    #[inline]
    pub fn is_op(&self) -> bool {
        matches!(self, DagNode::Op(_))
    }

    /// Get the instruction if this is an operation node.
    #[inline]
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            DagNode::Op(inst) => Some(inst),
            _ => None,
        }
    }
}

/// Identifier for a wire in the DAG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireId {
    /// A quantum wire.
    Qubit(QubitId),
    /// A classical wire.
    Clbit(ClbitId),
}

impl From<QubitId> for WireId {
    fn from(q: QubitId) -> Self {
        WireId::Qubit(q)
    }
}

impl From<ClbitId> for WireId {
    fn from(c: ClbitId) -> Self {
        WireId::Clbit(c)
    }
}

/// An edge in the circuit DAG representing a wire segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DagEdge {
    /// The wire this edge belongs to.
    pub wire: WireId,
}

/// DAG-based circuit representation.
///
/// ## Performance
///
/// A `wire_tail` index maps each wire to the node just before its Out
/// node, so `apply()` finds each wire's append point in O(1) instead of
/// scanning the Out node's incoming edges.
#[derive(Debug, Clone)]
pub struct CircuitDag {
    /// The underlying graph.
    graph: DiGraph<DagNode, DagEdge, u32>,
    /// Map from qubit to its input node.
    qubit_inputs: FxHashMap<QubitId, NodeIndex>,
    /// Map from qubit to its output node.
    qubit_outputs: FxHashMap<QubitId, NodeIndex>,
    /// Map from classical bit to its input node.
    clbit_inputs: FxHashMap<ClbitId, NodeIndex>,
    /// Map from classical bit to its output node.
    clbit_outputs: FxHashMap<ClbitId, NodeIndex>,
    /// Last node before the Out node on each wire. Maintained by
    /// `apply()` and `remove_op()`.
    wire_tail: FxHashMap<WireId, NodeIndex>,
}

impl CircuitDag {
    /// Create a new empty circuit DAG.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::default(),
            qubit_inputs: FxHashMap::default(),
            qubit_outputs: FxHashMap::default(),
            clbit_inputs: FxHashMap::default(),
            clbit_outputs: FxHashMap::default(),
            wire_tail: FxHashMap::default(),
        }
    }

    /// Add a qubit to the circuit. Adding an existing qubit is a no-op.
    pub fn add_qubit(&mut self, qubit: QubitId) {
        if self.qubit_inputs.contains_key(&qubit) {
            return;
        }
        let wire = WireId::Qubit(qubit);
        let in_node = self.graph.add_node(DagNode::In(wire));
        let out_node = self.graph.add_node(DagNode::Out(wire));
        self.graph.add_edge(in_node, out_node, DagEdge { wire });
        self.qubit_inputs.insert(qubit, in_node);
        self.qubit_outputs.insert(qubit, out_node);
        self.wire_tail.insert(wire, in_node);
    }

    /// Add a classical bit to the circuit.
    pub fn add_clbit(&mut self, clbit: ClbitId) {
        if self.clbit_inputs.contains_key(&clbit) {
            return;
        }
        let wire = WireId::Clbit(clbit);
        let in_node = self.graph.add_node(DagNode::In(wire));
        let out_node = self.graph.add_node(DagNode::Out(wire));
        self.graph.add_edge(in_node, out_node, DagEdge { wire });
        self.clbit_inputs.insert(clbit, in_node);
        self.clbit_outputs.insert(clbit, out_node);
        self.wire_tail.insert(wire, in_node);
    }

    /// Append an instruction to the circuit.
    ///
    /// Validates gate arity, operand existence, and operand uniqueness
    /// before touching the graph.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<NodeIndex> {
        let op_name = instruction.name().to_string();

        if let InstructionKind::Gate(gate) = &instruction.kind {
            let expected = gate.num_qubits();
            let got = u32::try_from(instruction.qubits.len()).unwrap_or(u32::MAX);
            if expected != got {
                return Err(IrError::QubitCountMismatch {
                    gate_name: op_name,
                    expected,
                    got,
                });
            }
        }

        for &qubit in &instruction.qubits {
            if !self.qubit_inputs.contains_key(&qubit) {
                return Err(IrError::QubitNotFound {
                    qubit,
                    op_name: Some(op_name),
                });
            }
        }
        for &clbit in &instruction.clbits {
            if !self.clbit_inputs.contains_key(&clbit) {
                return Err(IrError::ClbitNotFound {
                    clbit,
                    op_name: Some(op_name),
                });
            }
        }

        let mut seen = rustc_hash::FxHashSet::default();
        for &qubit in &instruction.qubits {
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    op_name: Some(op_name),
                });
            }
        }

        let wires: Vec<WireId> = instruction
            .qubits
            .iter()
            .map(|&q| WireId::Qubit(q))
            .chain(instruction.clbits.iter().map(|&c| WireId::Clbit(c)))
            .collect();

        let op_node = self.graph.add_node(DagNode::Op(instruction));

        // Splice the op into each wire just before the Out node.
        for wire in wires {
            let out_node = match wire {
                WireId::Qubit(q) => self.qubit_outputs[&q],
                WireId::Clbit(c) => self.clbit_outputs[&c],
            };
            let tail = self.wire_tail[&wire];

            let edge_id = self
                .graph
                .edges_directed(tail, Direction::Outgoing)
                .find(|e| e.weight().wire == wire && e.target() == out_node)
                .map(|e| e.id())
                .ok_or_else(|| {
                    IrError::InvalidDag(format!("missing tail edge for wire {wire:?}"))
                })?;

            self.graph.remove_edge(edge_id);
            self.graph.add_edge(tail, op_node, DagEdge { wire });
            self.graph.add_edge(op_node, out_node, DagEdge { wire });
            self.wire_tail.insert(wire, op_node);
        }

        Ok(op_node)
    }

    /// Iterate over operations in topological order.
    pub fn topological_ops(&self) -> impl Iterator<Item = (NodeIndex, &Instruction)> {
        petgraph::algo::toposort(&self.graph, None)
            .expect("circuit graph must stay acyclic")
            .into_iter()
            .filter_map(|idx| match &self.graph[idx] {
                DagNode::Op(inst) => Some((idx, inst)),
                _ => None,
            })
            .collect::<Vec<_>>()
            .into_iter()
    }

    /// Get an instruction by node index.
    #[inline]
    pub fn get_instruction(&self, node: NodeIndex) -> Option<&Instruction> {
        self.graph.node_weight(node).and_then(|n| n.instruction())
    }

    /// Remove an operation node, reconnecting its wires.
    ///
    /// WARNING: petgraph's `remove_node` swaps the removed node with the
    /// last node in the graph, invalidating that node's index. Do not
    /// hold `NodeIndex` values across removals; when removing several
    /// nodes, re-fetch indices after each call.
    pub fn remove_op(&mut self, node: NodeIndex) -> IrResult<Instruction> {
        let dag_node = self
            .graph
            .node_weight(node)
            .ok_or(IrError::InvalidNode)?
            .clone();

        let DagNode::Op(instruction) = dag_node else {
            return Err(IrError::InvalidDag(
                "cannot remove a wire In/Out node".into(),
            ));
        };

        let incoming: Vec<_> = self
            .graph
            .edges_directed(node, Direction::Incoming)
            .map(|e| (e.source(), e.weight().wire))
            .collect();
        let outgoing: Vec<_> = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .map(|e| (e.target(), e.weight().wire))
            .collect();

        // Wires whose tail is the removed node fall back to their
        // predecessor on that wire.
        for (pred, wire) in &incoming {
            if self.wire_tail.get(wire) == Some(&node) {
                self.wire_tail.insert(*wire, *pred);
            }
        }

        let last_idx = NodeIndex::new(self.graph.node_count() - 1);
        self.graph.remove_node(node);

        // petgraph swap-removes: the former last node now lives at
        // `node`. Remap every stored index that pointed at it.
        let fix = |idx: NodeIndex| -> NodeIndex {
            if last_idx != node && idx == last_idx {
                node
            } else {
                idx
            }
        };
        if last_idx != node {
            for map in [&mut self.qubit_inputs, &mut self.qubit_outputs] {
                for v in map.values_mut() {
                    if *v == last_idx {
                        *v = node;
                    }
                }
            }
            for map in [&mut self.clbit_inputs, &mut self.clbit_outputs] {
                for v in map.values_mut() {
                    if *v == last_idx {
                        *v = node;
                    }
                }
            }
            for v in self.wire_tail.values_mut() {
                if *v == last_idx {
                    *v = node;
                }
            }
        }

        for (pred, wire) in &incoming {
            let pred = fix(*pred);
            for (succ, succ_wire) in &outgoing {
                if wire == succ_wire {
                    self.graph
                        .add_edge(pred, fix(*succ), DagEdge { wire: *wire });
                }
            }
        }

        Ok(instruction)
    }

    /// Substitute a node with a sequence of instructions.
    ///
    /// The replacement instructions are appended at the end of their
    /// wires; callers use this during linear rewrites where the removed
    /// node is the current tail.
    pub fn substitute_node(
        &mut self,
        node: NodeIndex,
        replacement: impl IntoIterator<Item = Instruction>,
    ) -> IrResult<Vec<NodeIndex>> {
        let _old = self.remove_op(node)?;
        let mut new_nodes = vec![];
        for inst in replacement {
            new_nodes.push(self.apply(inst)?);
        }
        Ok(new_nodes)
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.qubit_inputs.len()
    }

    /// Get the number of classical bits.
    #[inline]
    pub fn num_clbits(&self) -> usize {
        self.clbit_inputs.len()
    }

    /// Get the number of operations.
    #[inline]
    pub fn num_ops(&self) -> usize {
        let io_nodes = 2 * (self.qubit_inputs.len() + self.clbit_inputs.len());
        self.graph.node_count().saturating_sub(io_nodes)
    }

    /// Calculate the circuit depth: the longest chain of operations.
    pub fn depth(&self) -> usize {
        self.depth_where(|_| true)
    }

    /// Calculate the depth counting only operations matching `filter`.
    ///
    /// Non-matching operations still propagate dependencies but
    /// contribute zero to chain length. With a two-qubit-gate filter
    /// this is the benchmark depth metric: the length of the longest
    /// dependency chain of two-qubit operations.
    pub fn depth_where(&self, filter: impl Fn(&Instruction) -> bool) -> usize {
        let mut depths: FxHashMap<NodeIndex, usize> =
            FxHashMap::with_capacity_and_hasher(self.graph.node_count(), Default::default());
        let mut max_depth = 0usize;

        for node in petgraph::algo::toposort(&self.graph, None)
            .expect("circuit graph must stay acyclic")
        {
            let pred_depth = self
                .graph
                .edges_directed(node, Direction::Incoming)
                .map(|e| depths.get(&e.source()).copied().unwrap_or(0))
                .max()
                .unwrap_or(0);

            let node_depth = match &self.graph[node] {
                DagNode::Op(inst) if filter(inst) => pred_depth + 1,
                _ => pred_depth,
            };

            max_depth = max_depth.max(node_depth);
            depths.insert(node, node_depth);
        }

        max_depth
    }

    /// Depth counting only two-qubit gates.
    pub fn two_qubit_depth(&self) -> usize {
        self.depth_where(Instruction::is_two_qubit_gate)
    }

    /// Count operations by name.
    pub fn count_ops(&self) -> FxHashMap<String, usize> {
        let mut counts = FxHashMap::default();
        for node in self.graph.node_weights() {
            if let DagNode::Op(inst) = node {
                *counts.entry(inst.name().to_string()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Count two-qubit gate operations.
    pub fn num_two_qubit_ops(&self) -> usize {
        self.graph
            .node_weights()
            .filter(|n| matches!(n, DagNode::Op(inst) if inst.is_two_qubit_gate()))
            .count()
    }

    /// Count operations with the given name.
    pub fn count_named(&self, name: &str) -> usize {
        self.graph
            .node_weights()
            .filter(|n| matches!(n, DagNode::Op(inst) if inst.name() == name))
            .count()
    }

    /// Iterate over qubits.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.qubit_inputs.keys().copied()
    }

    /// Iterate over classical bits.
    pub fn clbits(&self) -> impl Iterator<Item = ClbitId> + '_ {
        self.clbit_inputs.keys().copied()
    }

    /// Get a reference to the underlying graph.
    pub fn graph(&self) -> &DiGraph<DagNode, DagEdge, u32> {
        &self.graph
    }

    /// Verify the structural integrity of the DAG.
    ///
    /// Checks acyclicity, In/Out pairing per wire, wire continuity from
    /// In to Out, and reachability of every node.
    pub fn verify_integrity(&self) -> IrResult<()> {
        if petgraph::algo::is_cyclic_directed(&self.graph) {
            return Err(IrError::InvalidDag("graph contains a cycle".into()));
        }

        for &qubit in self.qubit_inputs.keys() {
            if !self.qubit_outputs.contains_key(&qubit) {
                return Err(IrError::InvalidDag(format!(
                    "qubit {qubit} has an In node but no Out node"
                )));
            }
        }
        for &clbit in self.clbit_inputs.keys() {
            if !self.clbit_outputs.contains_key(&clbit) {
                return Err(IrError::InvalidDag(format!(
                    "clbit {clbit} has an In node but no Out node"
                )));
            }
        }

        let qubit_walks = self
            .qubit_inputs
            .iter()
            .map(|(&q, &start)| (WireId::Qubit(q), start, self.qubit_outputs[&q]));
        let clbit_walks = self
            .clbit_inputs
            .iter()
            .map(|(&c, &start)| (WireId::Clbit(c), start, self.clbit_outputs[&c]));

        for (wire, start, end) in qubit_walks.chain(clbit_walks) {
            let mut current = start;
            let mut steps = 0usize;
            while current != end {
                let next = self
                    .graph
                    .edges_directed(current, Direction::Outgoing)
                    .find(|e| e.weight().wire == wire)
                    .map(|e| e.target());
                match next {
                    Some(n) => current = n,
                    None => {
                        return Err(IrError::InvalidDag(format!(
                            "wire {wire:?} is broken at node {current:?}"
                        )));
                    }
                }
                steps += 1;
                if steps > self.graph.node_count() {
                    return Err(IrError::InvalidDag(format!(
                        "wire {wire:?} does not terminate"
                    )));
                }
            }
        }

        // A successful toposort visits every node; anything missing is
        // unreachable.
        let topo = petgraph::algo::toposort(&self.graph, None).unwrap_or_default();
        if topo.len() != self.graph.node_count() {
            return Err(IrError::InvalidDag(
                "unreachable node found in DAG".into(),
            ));
        }

        Ok(())
    }
}

impl Default for CircuitDag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::StandardGate;

    fn bell_dag() -> CircuitDag {
        let mut dag = CircuitDag::new();
        dag.add_qubit(QubitId(0));
        dag.add_qubit(QubitId(1));
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();
        dag.apply(Instruction::two_qubit_gate(
            StandardGate::CX,
            QubitId(0),
            QubitId(1),
        ))
        .unwrap();
        dag
    }

    #[test]
    fn test_empty_dag() {
        let dag = CircuitDag::new();
        assert_eq!(dag.num_qubits(), 0);
        assert_eq!(dag.num_ops(), 0);
        assert_eq!(dag.depth(), 0);
        assert_eq!(dag.two_qubit_depth(), 0);
    }

    #[test]
    fn test_bell_depth() {
        let dag = bell_dag();
        assert_eq!(dag.num_ops(), 2);
        assert_eq!(dag.depth(), 2);
        // Only the CX counts toward two-qubit depth.
        assert_eq!(dag.two_qubit_depth(), 1);
    }

    #[test]
    fn test_parallel_gates_depth() {
        let mut dag = CircuitDag::new();
        dag.add_qubit(QubitId(0));
        dag.add_qubit(QubitId(1));
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(1)))
            .unwrap();
        assert_eq!(dag.depth(), 1);
        assert_eq!(dag.two_qubit_depth(), 0);
    }

    #[test]
    fn test_two_qubit_depth_chain() {
        // cx(0,1); h(1); cx(1,2): the H sits between the CXs but does
        // not extend the two-qubit chain beyond 2.
        let mut dag = CircuitDag::new();
        for i in 0..3 {
            dag.add_qubit(QubitId(i));
        }
        dag.apply(Instruction::two_qubit_gate(
            StandardGate::CX,
            QubitId(0),
            QubitId(1),
        ))
        .unwrap();
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(1)))
            .unwrap();
        dag.apply(Instruction::two_qubit_gate(
            StandardGate::CX,
            QubitId(1),
            QubitId(2),
        ))
        .unwrap();

        assert_eq!(dag.depth(), 3);
        assert_eq!(dag.two_qubit_depth(), 2);
    }

    #[test]
    fn test_count_ops() {
        let dag = bell_dag();
        let counts = dag.count_ops();
        assert_eq!(counts.get("h"), Some(&1));
        assert_eq!(counts.get("cx"), Some(&1));
        assert_eq!(dag.num_two_qubit_ops(), 1);
        assert_eq!(dag.count_named("cx"), 1);
    }

    #[test]
    fn test_arity_mismatch() {
        let mut dag = CircuitDag::new();
        dag.add_qubit(QubitId(0));
        let result = dag.apply(Instruction::gate(StandardGate::CX, [QubitId(0)]));
        assert!(matches!(
            result,
            Err(IrError::QubitCountMismatch { expected: 2, got: 1, .. })
        ));
    }

    #[test]
    fn test_unknown_qubit() {
        let mut dag = CircuitDag::new();
        dag.add_qubit(QubitId(0));
        let result = dag.apply(Instruction::two_qubit_gate(
            StandardGate::CX,
            QubitId(0),
            QubitId(9),
        ));
        assert!(matches!(
            result,
            Err(IrError::QubitNotFound { qubit: QubitId(9), .. })
        ));
    }

    #[test]
    fn test_duplicate_operand() {
        let mut dag = CircuitDag::new();
        dag.add_qubit(QubitId(0));
        let result = dag.apply(Instruction::two_qubit_gate(
            StandardGate::CX,
            QubitId(0),
            QubitId(0),
        ));
        assert!(matches!(result, Err(IrError::DuplicateQubit { .. })));
    }

    #[test]
    fn test_remove_op_reconnects() {
        let mut dag = bell_dag();
        let cx_node = dag
            .topological_ops()
            .find(|(_, inst)| inst.name() == "cx")
            .map(|(idx, _)| idx)
            .unwrap();
        let removed = dag.remove_op(cx_node).unwrap();
        assert_eq!(removed.name(), "cx");
        assert_eq!(dag.num_ops(), 1);
        dag.verify_integrity().unwrap();

        // The wire is whole again: another op can be appended.
        dag.apply(Instruction::two_qubit_gate(
            StandardGate::CZ,
            QubitId(0),
            QubitId(1),
        ))
        .unwrap();
        assert_eq!(dag.num_ops(), 2);
        dag.verify_integrity().unwrap();
    }

    #[test]
    fn test_substitute_node() {
        let mut dag = bell_dag();
        let cx_node = dag
            .topological_ops()
            .find(|(_, inst)| inst.name() == "cx")
            .map(|(idx, _)| idx)
            .unwrap();
        dag.substitute_node(
            cx_node,
            [
                Instruction::single_qubit_gate(StandardGate::H, QubitId(1)),
                Instruction::two_qubit_gate(StandardGate::CZ, QubitId(0), QubitId(1)),
                Instruction::single_qubit_gate(StandardGate::H, QubitId(1)),
            ],
        )
        .unwrap();
        assert_eq!(dag.num_ops(), 4);
        assert_eq!(dag.count_named("cz"), 1);
        dag.verify_integrity().unwrap();
    }

    #[test]
    fn test_verify_integrity_with_measurement() {
        let mut dag = CircuitDag::new();
        dag.add_qubit(QubitId(0));
        dag.add_clbit(ClbitId(0));
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();
        dag.apply(Instruction::measure(QubitId(0), ClbitId(0)))
            .unwrap();
        dag.verify_integrity().unwrap();
    }
}
