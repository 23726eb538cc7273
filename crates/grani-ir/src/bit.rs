//! Qubit and classical bit identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a qubit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

impl From<usize> for QubitId {
    fn from(id: usize) -> Self {
        QubitId(u32::try_from(id).expect("QubitId overflow: exceeds u32::MAX"))
    }
}

/// Unique identifier for a classical bit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClbitId(pub u32);

impl fmt::Display for ClbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl From<u32> for ClbitId {
    fn from(id: u32) -> Self {
        ClbitId(id)
    }
}

impl From<usize> for ClbitId {
    fn from(id: usize) -> Self {
        ClbitId(u32::try_from(id).expect("ClbitId overflow: exceeds u32::MAX"))
    }
}

/// A quantum register: a named, contiguous block of qubits.
///
/// Benchmark programs address qubits as `reg[index]`; the register
/// records the id of its first qubit so indices map to flat ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantumRegister {
    /// Register name as declared in the source.
    pub name: String,
    /// Id of the first qubit in the register.
    pub start: QubitId,
    /// Number of qubits.
    pub size: u32,
}

impl QuantumRegister {
    /// Resolve an index within this register to a flat qubit id.
    pub fn qubit(&self, index: u32) -> Option<QubitId> {
        (index < self.size).then(|| QubitId(self.start.0 + index))
    }

    /// Iterate over the qubit ids of this register.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        (self.start.0..self.start.0 + self.size).map(QubitId)
    }
}

/// A classical register: a named, contiguous block of classical bits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicalRegister {
    /// Register name as declared in the source.
    pub name: String,
    /// Id of the first bit in the register.
    pub start: ClbitId,
    /// Number of bits.
    pub size: u32,
}

impl ClassicalRegister {
    /// Resolve an index within this register to a flat classical bit id.
    pub fn clbit(&self, index: u32) -> Option<ClbitId> {
        (index < self.size).then(|| ClbitId(self.start.0 + index))
    }

    /// Iterate over the classical bit ids of this register.
    pub fn clbits(&self) -> impl Iterator<Item = ClbitId> + '_ {
        (self.start.0..self.start.0 + self.size).map(ClbitId)
    }
}
