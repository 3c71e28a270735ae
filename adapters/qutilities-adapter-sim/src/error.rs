//! Error types for the simulator adapter.

use qutilities_ir::QubitId;
use thiserror::Error;

/// Errors raised while simulating a gate sequence.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// The sequence is wider than the simulator allows.
    #[error("Sequence has {requested} qubits but the simulator supports at most {max}")]
    TooManyQubits {
        /// Width of the sequence.
        requested: u32,
        /// Configured limit.
        max: u32,
    },

    /// A measured qubit is used again later in the sequence.
    #[error("Qubit {0} is used after being measured; only terminal measurements are supported")]
    MidCircuitMeasurement(QubitId),

    /// A permutation table does not cover the target register.
    #[error("Permutation for '{name}' has {got} entries, expected {expected}")]
    InvalidPermutation {
        /// Name of the unitary.
        name: String,
        /// `2^targets`.
        expected: usize,
        /// Actual table length.
        got: usize,
    },

    /// Amplitude vector length is not a power of two.
    #[error("Amplitude vector of length {0} is not a power of two")]
    InvalidDimension(usize),

    /// An instruction's operand count does not match its gate.
    #[error("Instruction '{name}' has {got} operands, expected {expected}")]
    OperandMismatch {
        /// Instruction name.
        name: String,
        /// Expected operand count.
        expected: usize,
        /// Actual operand count.
        got: usize,
    },
}

/// Result type for simulation.
pub type SimResult<T> = Result<T, SimError>;
