//! Wrapping function oracles into phase-kickback circuits.
//!
//! An oracle acts on `n` input qubits followed by one ancilla. The compiled
//! circuit prepares the ancilla in `|−⟩`, puts the inputs in uniform
//! superposition, applies the oracle and measures the inputs after a final
//! layer of Hadamards. A constant function always reads all zeros.

use qutilities_ir::{Counts, GateSequence};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AlgoError, AlgoResult};

/// Whether a Boolean function is constant or balanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionClass {
    /// Same output for every input.
    Constant,
    /// Output 1 on exactly half of the inputs.
    Balanced,
}

impl std::fmt::Display for FunctionClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FunctionClass::Constant => write!(f, "constant"),
            FunctionClass::Balanced => write!(f, "balanced"),
        }
    }
}

/// Wrap an `n + 1`-qubit oracle into the full measured circuit.
///
/// The result has `n` classical bits; input qubit `k` is measured into bit `k`.
pub fn compile_oracle_circuit(oracle: &GateSequence) -> AlgoResult<GateSequence> {
    let width = oracle.num_qubits();
    if width < 2 {
        return Err(AlgoError::OracleTooNarrow {
            label: oracle.label().to_string(),
            width,
        });
    }
    let num_inputs = width - 1;

    let mut seq = GateSequence::new(format!("{} circuit", oracle.label()));
    let inputs = seq.add_qreg("control", num_inputs);
    let ancilla = seq.add_qreg("ancilla", 1);
    let result = seq.add_creg("result", num_inputs);

    seq.x(ancilla[0])?;
    seq.barrier_all()?;
    for &q in inputs.iter().chain(&ancilla) {
        seq.h(q)?;
    }
    seq.barrier_all()?;
    seq.append_at(oracle, 0)?;
    seq.barrier_all()?;
    for &q in &inputs {
        seq.h(q)?;
    }
    for (&q, &c) in inputs.iter().zip(&result) {
        seq.measure(q, c)?;
    }

    debug!(num_inputs, instructions = seq.len(), "compiled oracle circuit");
    Ok(seq)
}

/// Classify a function from the counts of its compiled circuit.
///
/// Constant if and only if every observed outcome is all zeros.
pub fn classify(counts: &Counts) -> AlgoResult<FunctionClass> {
    if counts.is_empty() {
        return Err(AlgoError::NoCounts);
    }
    let all_zero = counts
        .iter()
        .filter(|(_, n)| *n > 0)
        .all(|(bits, _)| bits.chars().all(|c| c == '0'));
    Ok(if all_zero {
        FunctionClass::Constant
    } else {
        FunctionClass::Balanced
    })
}
