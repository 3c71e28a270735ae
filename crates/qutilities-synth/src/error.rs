//! Error types for the synth crate.

use thiserror::Error;

/// Invalid construction parameters, reported before anything is emitted.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A QFT over zero qubits was requested.
    #[error("QFT needs at least 1 qubit, got 0")]
    NoQubits,

    /// Approximation level outside `0..=num_qubits-1`.
    #[error("approximation level {level} exceeds the maximum of {max} for {num_qubits} qubits")]
    ApproximationTooLarge {
        /// Requested approximation level.
        level: u32,
        /// Width of the transform.
        num_qubits: u32,
        /// Largest allowed level.
        max: u32,
    },

    /// Phase estimation with an empty control register.
    #[error("phase estimation needs at least 1 control qubit, got 0")]
    NoControlQubits,

    /// Phase estimation with an empty phase register.
    #[error("phase estimation needs at least 1 phase qubit, got 0")]
    NoPhaseQubits,

    /// More control qubits than a 64-bit power exponent can address.
    #[error("{control_qubits} control qubits requested, at most {max} are supported")]
    TooManyControlQubits {
        /// Requested control register width.
        control_qubits: u32,
        /// Supported maximum.
        max: u32,
    },

    /// Both a rotation angle and a unitary were given.
    #[error("set either theta or a unitary, not both")]
    AmbiguousRotation,

    /// Neither a rotation angle nor a unitary was given.
    #[error("one of theta or a unitary must be set")]
    MissingRotation,

    /// Theta mode acts on a single phase qubit.
    #[error("theta rotations need exactly 1 phase qubit, got {phase_qubits}")]
    ThetaNeedsSinglePhaseQubit {
        /// Requested phase register width.
        phase_qubits: u32,
    },

    /// Theta is NaN or infinite.
    #[error("theta must be finite, got {0}")]
    NonFiniteTheta(f64),

    /// The unitary's width differs from the phase register.
    #[error("unitary '{unitary}' acts on {got} qubits but the phase register has {expected}")]
    UnitaryWidthMismatch {
        /// Name of the unitary.
        unitary: String,
        /// Phase register width.
        expected: u32,
        /// Unitary width.
        got: u32,
    },
}

/// Errors produced by QFT and QPE synthesis.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SynthError {
    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The unitary cannot be raised to a power or controlled.
    #[error("Unitary '{name}' is unsupported: {reason}")]
    UnsupportedUnitary {
        /// Name of the unitary.
        name: String,
        /// Which capability is missing.
        reason: String,
    },

    /// Embedding or exporting a sequence failed.
    #[error("Composition error: {0}")]
    Composition(#[from] qutilities_ir::IrError),
}

/// Result type for synthesis operations.
pub type SynthResult<T> = Result<T, SynthError>;
