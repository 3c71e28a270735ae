//! OpenQASM 3 output for qutilities gate sequences.
//!
//! ```rust
//! use qutilities_ir::{GateSequence, QubitId};
//! use qutilities_qasm3::emit;
//! use std::f64::consts::PI;
//!
//! let mut seq = GateSequence::with_size("QFT (2)", 2, 0);
//! seq.h(QubitId(1))?.cp(PI / 2.0, QubitId(1), QubitId(0))?;
//!
//! let qasm = emit(&seq)?;
//! assert!(qasm.contains("cp(pi/2) q[1], q[0];"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod emitter;
pub mod error;

pub use emitter::{emit, format_angle};
pub use error::{EmitError, EmitResult};
