//! `qutilities-algo`: textbook algorithms assembled from qutilities parts.
//!
//! - **Deutsch** on the four one-bit functions ([`DeutschFunction`])
//! - **Deutsch–Jozsa** with constant and balanced oracles
//!   ([`deutsch_jozsa`]) and the shared kickback wrapper
//!   ([`compile_oracle_circuit`])
//! - **Order finding** as phase estimation of modular multiplication
//!   ([`OrderFinding`])
//!
//! Every builder returns a measured [`GateSequence`](qutilities_ir::GateSequence);
//! running it is up to an [`ExecutionBackend`](qutilities_ir::ExecutionBackend).
//!
//! ```rust
//! use qutilities_algo::{DeutschFunction, FunctionClass, OrderFinding};
//!
//! let f = DeutschFunction::from_case(3).unwrap();
//! assert_eq!(f.class(), FunctionClass::Balanced);
//! assert_eq!(f.circuit().unwrap().num_clbits(), 1);
//!
//! let circuit = OrderFinding::new(15).with_base(7).build().unwrap();
//! assert_eq!(circuit.sequence.num_qubits(), 12);
//! ```

pub mod deutsch;
pub mod deutsch_jozsa;
pub mod error;
pub mod oracle;
pub mod order_finding;

pub use deutsch::DeutschFunction;
pub use error::{AlgoError, AlgoResult};
pub use oracle::{FunctionClass, classify, compile_oracle_circuit};
pub use order_finding::{ModularMultiplication, OrderFinding, OrderFindingCircuit, select_base};
