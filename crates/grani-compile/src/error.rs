//! Error types for the compilation pipeline.

use thiserror::Error;

/// Errors that can occur during compilation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// A pass required a coupling map that was not set.
    #[error("No coupling map in the property set")]
    MissingCouplingMap,

    /// A pass required a layout that was not set.
    #[error("No layout in the property set")]
    MissingLayout,

    /// A pass required basis gates that were not set.
    #[error("No basis gates in the property set")]
    MissingBasisGates,

    /// The circuit does not fit on the target device.
    #[error("Circuit requires {required} qubits but the target has {available}")]
    CircuitTooLarge {
        /// Qubits required by the circuit.
        required: usize,
        /// Qubits available on the target.
        available: u32,
    },

    /// No path exists between two physical qubits.
    #[error("Routing failed: no path between physical qubits {qubit1} and {qubit2}")]
    RoutingFailed {
        /// First physical qubit.
        qubit1: u32,
        /// Second physical qubit.
        qubit2: u32,
    },

    /// A gate could not be decomposed into the target basis.
    #[error("Translation failed: no decomposition of '{gate}' into the target basis")]
    TranslationFailed {
        /// Name of the untranslatable gate.
        gate: String,
    },

    /// IR error during a transformation.
    #[error("IR error: {0}")]
    Ir(#[from] grani_ir::IrError),
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
