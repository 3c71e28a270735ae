//! Error types for the QASM3 emitter.

use thiserror::Error;

/// Errors that can occur while emitting.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EmitError {
    /// A unitary has no gate-level body to write out.
    #[error("Unitary '{name}' is defined as a basis permutation and has no OpenQASM 3 form")]
    UnsupportedDefinition {
        /// Name of the unitary.
        name: String,
    },
}

/// Result type for emitting operations.
pub type EmitResult<T> = Result<T, EmitError>;
