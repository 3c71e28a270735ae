//! Error types for the algo crate.

use thiserror::Error;

/// Errors produced while building oracle and order-finding circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AlgoError {
    /// Deutsch function cases are numbered 1 to 4.
    #[error("Deutsch case must be 1, 2, 3 or 4, got {0}")]
    InvalidCase(u8),

    /// Oracle input register outside the supported range.
    #[error("oracle needs between 1 and {max} input qubits, got {got}")]
    InvalidInputCount {
        /// Requested input register width.
        got: u32,
        /// Supported maximum.
        max: u32,
    },

    /// The on-states of a balanced oracle do not cover exactly half the inputs.
    #[error("balanced oracle needs {expected} distinct on-states below {limit}, got {got}")]
    UnbalancedStates {
        /// `2^(n-1)`.
        expected: usize,
        /// `2^n`.
        limit: u64,
        /// Distinct in-range states supplied.
        got: usize,
    },

    /// An oracle sequence is too narrow to carry an ancilla.
    #[error("oracle '{label}' has {width} qubits, at least 2 are needed")]
    OracleTooNarrow {
        /// Oracle label.
        label: String,
        /// Oracle width.
        width: u32,
    },

    /// No measurement counts were supplied.
    #[error("no measurement counts to classify")]
    NoCounts,

    /// Modulus outside the supported range.
    #[error("modulus must be between 3 and {max}, got {got}")]
    InvalidModulus {
        /// Requested modulus.
        got: u64,
        /// Supported maximum.
        max: u64,
    },

    /// Base unsuitable for the modulus.
    #[error("base {base} is invalid for modulus {modulus}: {reason}")]
    InvalidBase {
        /// Requested base.
        base: u64,
        /// Modulus.
        modulus: u64,
        /// Why it was rejected.
        reason: String,
    },

    /// Phase estimation could not be composed.
    #[error("Synthesis error: {0}")]
    Synth(#[from] qutilities_synth::SynthError),

    /// Sequence builder returned an error.
    #[error("Sequence error: {0}")]
    Ir(#[from] qutilities_ir::IrError),
}

/// Result type for algorithm construction.
pub type AlgoResult<T> = Result<T, AlgoError>;
