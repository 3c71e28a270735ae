//! Reference statevector backend for qutilities.
//!
//! Runs finished gate sequences exactly, so synthesized fragments can be
//! checked against their intended action. It understands every instruction
//! the IR can hold, including opaque gates and controlled powers defined by
//! gate bodies or basis permutations.
//!
//! | Qubits | Memory |
//! |--------|--------|
//! | 10 | ~16 KB |
//! | 15 | ~512 KB |
//! | 20 | ~16 MB |
//!
//! # Example
//!
//! ```rust
//! use qutilities_adapter_sim::SimulatorBackend;
//! use qutilities_ir::{ClbitId, ExecutionBackend, GateSequence, QubitId};
//!
//! let mut seq = GateSequence::with_size("bell", 2, 2);
//! seq.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?;
//! seq.measure(QubitId(0), ClbitId(0))?.measure(QubitId(1), ClbitId(1))?;
//!
//! let counts = SimulatorBackend::new().with_seed(1).run(&seq, 100)?;
//! assert_eq!(counts.get("00") + counts.get("11"), 100);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
mod simulator;
mod statevector;

pub use error::{SimError, SimResult};
pub use simulator::SimulatorBackend;
pub use statevector::Statevector;
