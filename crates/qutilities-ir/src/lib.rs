//! Gate-sequence representation for the qutilities synthesis stack.
//!
//! This crate holds the data model every other qutilities crate builds on:
//! an ordered [`GateSequence`] over a fixed number of qubits and classical
//! bits, a small closed set of [`StandardGate`]s, frozen sub-sequences
//! ([`OpaqueGate`]) and controlled powers of caller-supplied unitaries
//! ([`UnitaryHandle`]).
//!
//! # Example: Building a two-qubit Fourier transform by hand
//!
//! ```rust
//! use qutilities_ir::{GateSequence, QubitId};
//! use std::f64::consts::PI;
//!
//! let mut seq = GateSequence::with_size("QFT (2)", 2, 0);
//! seq.h(QubitId(1))?
//!     .cp(PI / 2.0, QubitId(1), QubitId(0))?
//!     .h(QubitId(0))?
//!     .swap(QubitId(0), QubitId(1))?;
//!
//! assert_eq!(seq.len(), 4);
//! let gate = seq.to_gate()?;
//! assert_eq!(gate.label(), "QFT (2)");
//! # Ok::<(), qutilities_ir::IrError>(())
//! ```
//!
//! # Conventions
//!
//! Qubit `i` is bit `i` of a basis-state index, and measured bitstrings put
//! classical bit 0 rightmost.

pub mod backend;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod opaque;
pub mod qubit;
pub mod sequence;
pub mod unitary;

pub use backend::{Counts, ExecutionBackend};
pub use error::{IrError, IrResult};
pub use gate::{ControlledPower, Gate, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use opaque::OpaqueGate;
pub use qubit::{Clbit, ClbitId, Qubit, QubitId, RegisterSlot, Wire};
pub use sequence::GateSequence;
pub use unitary::{GateUnitary, MAX_POWER_INSTRUCTIONS, SharedUnitary, UnitaryDefinition, UnitaryHandle, UnitaryRef};
