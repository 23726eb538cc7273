//! Error types for the benchmark harness.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while benchmarking.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BenchError {
    /// A requested circuit exists in no configured source.
    #[error("Circuit '{0}' not found in any source")]
    CircuitNotFound(String),

    /// A circuit file failed to load or parse.
    #[error("Failed to load circuit '{name}': {reason}")]
    LoadFailed {
        /// Circuit name.
        name: String,
        /// What went wrong.
        reason: String,
    },

    /// Two transpilers share a name.
    #[error("Transpilers must have unique names; '{0}' appears more than once")]
    DuplicateTranspiler(String),

    /// A metric could not be computed for a run.
    #[error("Metric '{metric}' unavailable: {reason}")]
    MetricUnavailable {
        /// Metric name.
        metric: String,
        /// Why it could not be computed.
        reason: String,
    },

    /// Configuration problem (bad pattern, unknown name, ...).
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Filesystem error with path context.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// QASM parse error.
    #[error("Parse error: {0}")]
    Parse(#[from] grani_qasm::ParseError),

    /// Compilation error from the pipeline.
    #[error("Compile error: {0}")]
    Compile(#[from] grani_compile::CompileError),

    /// IR error.
    #[error("IR error: {0}")]
    Ir(#[from] grani_ir::IrError),

    /// Report serialization error.
    #[error("Export error: {0}")]
    Export(#[from] serde_json::Error),
}

/// Result type for benchmark operations.
pub type BenchResult<T> = Result<T, BenchError>;
