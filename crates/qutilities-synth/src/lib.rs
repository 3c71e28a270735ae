//! `qutilities-synth`: Fourier transform and phase estimation synthesis.
//!
//! Turns a small configuration into the exact ordered gate sequence that
//! realises it:
//!
//! - **QFT / inverse QFT** with approximation pruning, swap reordering and
//!   optional barriers ([`QftGenerator`])
//! - **Quantum phase estimation** over a phase angle or an arbitrary
//!   unitary handle ([`QpeComposer`])
//!
//! Both can be frozen into an [`OpaqueGate`](qutilities_ir::OpaqueGate) for
//! embedding in larger sequences.
//!
//! # Quick start
//!
//! ```rust
//! use qutilities_synth::{QftConfig, QftGenerator, QpeComposer, QpeConfig};
//!
//! let qft = QftGenerator::new(QftConfig::new(4).with_approximation(1))
//!     .build()
//!     .unwrap();
//! assert_eq!(qft.label(), "QFT (4)");
//!
//! let qpe = QpeComposer::new(QpeConfig::new(3, 1).with_theta(0.25).with_init_phase(true))
//!     .build()
//!     .unwrap();
//! assert_eq!(qpe.num_qubits(), 4);
//! assert_eq!(qpe.num_clbits(), 3);
//! ```

pub mod error;
pub mod qft;
pub mod qpe;

pub use error::{ConfigError, SynthError, SynthResult};
pub use qft::{QftConfig, QftGenerator};
pub use qpe::{MAX_CONTROL_QUBITS, QpeComposer, QpeConfig, RotationSource};
