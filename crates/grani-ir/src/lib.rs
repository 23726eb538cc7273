//! Grani Circuit Intermediate Representation
//!
//! Core data structures for representing the static quantum circuits the
//! benchmark harness operates on. Circuits are held as a DAG (directed
//! acyclic graph) over wires, which is what the transpilation passes and
//! the depth analyses work against; the high-level [`Circuit`] API
//! provides a builder over it.
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use grani_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell_n2", 2, 0);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.depth(), 2);
//! // Two-qubit depth counts only the CX.
//! assert_eq!(circuit.two_qubit_depth(), 1);
//! ```
//!
//! The gate set follows the OpenQASM 2.0 standard library, with angles
//! held as concrete `f64` values; benchmark programs are static text,
//! so there is nothing symbolic to carry.

pub mod bit;
pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;

pub use bit::{ClassicalRegister, ClbitId, QuantumRegister, QubitId};
pub use circuit::Circuit;
pub use dag::{CircuitDag, DagEdge, DagNode, NodeIndex, WireId};
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
