//! Quantum gate types.
//!
//! The gate set mirrors the OpenQASM 2.0 standard library (`qelib1.inc`),
//! which is what the benchmark corpus is written in. Gate angles are
//! concrete `f64` values: benchmark programs are static, so every
//! parameter expression has been evaluated by the time a gate is built.

use serde::{Deserialize, Serialize};

/// A standard gate with known semantics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Phase gate U1(λ) = diag(1, e^{iλ}).
    U1(f64),
    /// U2(φ, λ): single-qubit gate with θ fixed at π/2.
    U2(f64, f64),
    /// Universal single-qubit gate U3(θ, φ, λ).
    U3(f64, f64, f64),

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// Controlled-Hadamard gate.
    CH,
    /// SWAP gate.
    Swap,
    /// Controlled rotation around X.
    CRx(f64),
    /// Controlled rotation around Y.
    CRy(f64),
    /// Controlled rotation around Z.
    CRz(f64),
    /// Controlled phase gate.
    CU1(f64),
    /// Controlled U3 gate.
    CU3(f64, f64, f64),
    /// ZZ interaction gate.
    RZZ(f64),

    // Three-qubit gates
    /// Toffoli gate (CCX).
    CCX,
    /// Fredkin gate (CSWAP).
    CSwap,
}

impl StandardGate {
    /// Get the QASM name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::U1(_) => "u1",
            StandardGate::U2(_, _) => "u2",
            StandardGate::U3(_, _, _) => "u3",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::CH => "ch",
            StandardGate::Swap => "swap",
            StandardGate::CRx(_) => "crx",
            StandardGate::CRy(_) => "cry",
            StandardGate::CRz(_) => "crz",
            StandardGate::CU1(_) => "cu1",
            StandardGate::CU3(_, _, _) => "cu3",
            StandardGate::RZZ(_) => "rzz",
            StandardGate::CCX => "ccx",
            StandardGate::CSwap => "cswap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::SX
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::U1(_)
            | StandardGate::U2(_, _)
            | StandardGate::U3(_, _, _) => 1,

            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CH
            | StandardGate::Swap
            | StandardGate::CRx(_)
            | StandardGate::CRy(_)
            | StandardGate::CRz(_)
            | StandardGate::CU1(_)
            | StandardGate::CU3(_, _, _)
            | StandardGate::RZZ(_) => 2,

            StandardGate::CCX | StandardGate::CSwap => 3,
        }
    }

    /// Check if this is a two-qubit gate.
    ///
    /// Two-qubit gates are what the depth metric counts, and what
    /// routing has to care about.
    #[inline]
    pub fn is_two_qubit(&self) -> bool {
        self.num_qubits() == 2
    }

    /// Get the angle parameters of this gate, in declaration order.
    pub fn params(&self) -> Vec<f64> {
        match *self {
            StandardGate::Rx(t)
            | StandardGate::Ry(t)
            | StandardGate::Rz(t)
            | StandardGate::U1(t)
            | StandardGate::CRx(t)
            | StandardGate::CRy(t)
            | StandardGate::CRz(t)
            | StandardGate::CU1(t)
            | StandardGate::RZZ(t) => vec![t],

            StandardGate::U2(a, b) => vec![a, b],

            StandardGate::U3(a, b, c) | StandardGate::CU3(a, b, c) => vec![a, b, c],

            _ => vec![],
        }
    }

    /// Build a gate from its QASM name and evaluated parameters.
    ///
    /// Returns `None` for unknown names or a parameter count mismatch.
    pub fn from_name(name: &str, params: &[f64]) -> Option<Self> {
        let gate = match (name, params) {
            ("id", []) => StandardGate::I,
            ("x", []) => StandardGate::X,
            ("y", []) => StandardGate::Y,
            ("z", []) => StandardGate::Z,
            ("h", []) => StandardGate::H,
            ("s", []) => StandardGate::S,
            ("sdg", []) => StandardGate::Sdg,
            ("t", []) => StandardGate::T,
            ("tdg", []) => StandardGate::Tdg,
            ("sx", []) => StandardGate::SX,
            ("rx", &[t]) => StandardGate::Rx(t),
            ("ry", &[t]) => StandardGate::Ry(t),
            ("rz", &[t]) => StandardGate::Rz(t),
            // u1/p and u/u3 are aliases across qelib revisions
            ("u1" | "p", &[t]) => StandardGate::U1(t),
            ("u2", &[a, b]) => StandardGate::U2(a, b),
            ("u3" | "u" | "U", &[a, b, c]) => StandardGate::U3(a, b, c),
            ("cx" | "CX", []) => StandardGate::CX,
            ("cy", []) => StandardGate::CY,
            ("cz", []) => StandardGate::CZ,
            ("ch", []) => StandardGate::CH,
            ("swap", []) => StandardGate::Swap,
            ("crx", &[t]) => StandardGate::CRx(t),
            ("cry", &[t]) => StandardGate::CRy(t),
            ("crz", &[t]) => StandardGate::CRz(t),
            ("cu1" | "cp", &[t]) => StandardGate::CU1(t),
            ("cu3", &[a, b, c]) => StandardGate::CU3(a, b, c),
            ("rzz", &[t]) => StandardGate::RZZ(t),
            ("ccx", []) => StandardGate::CCX,
            ("cswap", []) => StandardGate::CSwap,
            _ => return None,
        };
        Some(gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_gate_arity() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::CX.num_qubits(), 2);
        assert_eq!(StandardGate::CCX.num_qubits(), 3);
        assert!(StandardGate::CZ.is_two_qubit());
        assert!(!StandardGate::U3(0.1, 0.2, 0.3).is_two_qubit());
    }

    #[test]
    fn test_gate_params() {
        assert!(StandardGate::H.params().is_empty());
        assert_eq!(StandardGate::Rz(PI).params(), vec![PI]);
        assert_eq!(StandardGate::U3(1.0, 2.0, 3.0).params(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(StandardGate::from_name("h", &[]), Some(StandardGate::H));
        assert_eq!(
            StandardGate::from_name("rx", &[PI / 2.0]),
            Some(StandardGate::Rx(PI / 2.0))
        );
        // alias resolution
        assert_eq!(
            StandardGate::from_name("p", &[0.5]),
            Some(StandardGate::U1(0.5))
        );
        assert_eq!(StandardGate::from_name("h", &[1.0]), None);
        assert_eq!(StandardGate::from_name("frobnicate", &[]), None);
    }
}
