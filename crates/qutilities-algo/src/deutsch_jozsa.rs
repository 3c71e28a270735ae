//! Deutsch–Jozsa oracles over `n` input bits.
//!
//! A constant oracle flips the ancilla or leaves it alone. A balanced
//! oracle marks exactly `2^(n-1)` on-states, each with a multi-controlled
//! X sandwiched between X gates that select the state's zero bits.

use qutilities_ir::{GateSequence, QubitId};
use rand::Rng;
use tracing::debug;

use crate::error::{AlgoError, AlgoResult};
use crate::oracle::FunctionClass;

/// Largest input register a balanced oracle is built for.
pub const MAX_ORACLE_INPUTS: u32 = 16;

fn check_inputs(num_inputs: u32) -> AlgoResult<()> {
    if num_inputs == 0 || num_inputs > MAX_ORACLE_INPUTS {
        return Err(AlgoError::InvalidInputCount {
            got: num_inputs,
            max: MAX_ORACLE_INPUTS,
        });
    }
    Ok(())
}

fn oracle_registers(label: String, num_inputs: u32) -> (GateSequence, Vec<QubitId>, QubitId) {
    let mut seq = GateSequence::new(label);
    let inputs = seq.add_qreg("control", num_inputs);
    let ancilla = seq.add_qreg("ancilla", 1)[0];
    (seq, inputs, ancilla)
}

/// Oracle for the constant function with the given output.
pub fn constant_oracle(num_inputs: u32, output: bool) -> AlgoResult<GateSequence> {
    check_inputs(num_inputs)?;
    let (mut seq, _, ancilla) =
        oracle_registers(format!("DJ constant {} ({num_inputs})", u8::from(output)), num_inputs);
    if output {
        seq.x(ancilla)?;
    }
    Ok(seq)
}

/// Oracle for a balanced function with random on-states.
pub fn balanced_oracle<R: Rng + ?Sized>(num_inputs: u32, rng: &mut R) -> AlgoResult<GateSequence> {
    check_inputs(num_inputs)?;
    let total = 1usize << num_inputs;
    let on_states: Vec<u64> = rand::seq::index::sample(rng, total, total / 2)
        .into_iter()
        .map(|i| i as u64)
        .collect();
    balanced_oracle_from_states(num_inputs, &on_states)
}

/// Oracle for the balanced function that is 1 exactly on `on_states`.
///
/// Bit `i` of each state is the value of input qubit `i`. States are
/// marked in ascending order.
pub fn balanced_oracle_from_states(num_inputs: u32, on_states: &[u64]) -> AlgoResult<GateSequence> {
    check_inputs(num_inputs)?;
    let limit = 1u64 << num_inputs;
    let expected = 1usize << (num_inputs - 1);

    let mut states: Vec<u64> = on_states.iter().copied().filter(|&s| s < limit).collect();
    states.sort_unstable();
    states.dedup();
    if states.len() != expected || on_states.len() != expected {
        return Err(AlgoError::UnbalancedStates {
            expected,
            limit,
            got: states.len(),
        });
    }

    let (mut seq, inputs, ancilla) =
        oracle_registers(format!("DJ balanced ({num_inputs})"), num_inputs);
    for &state in &states {
        let flips: Vec<QubitId> = inputs
            .iter()
            .copied()
            .filter(|q| (state >> q.0) & 1 == 0)
            .collect();
        seq.barrier_all()?;
        for &q in &flips {
            seq.x(q)?;
        }
        seq.mcx(&inputs, ancilla)?;
        for &q in &flips {
            seq.x(q)?;
        }
    }
    seq.barrier_all()?;

    debug!(num_inputs, on_states = states.len(), "built balanced oracle");
    Ok(seq)
}

/// Oracle of the requested class; balanced oracles draw from `rng`.
pub fn oracle<R: Rng + ?Sized>(
    num_inputs: u32,
    class: FunctionClass,
    rng: &mut R,
) -> AlgoResult<GateSequence> {
    match class {
        FunctionClass::Constant => constant_oracle(num_inputs, rng.r#gen()),
        FunctionClass::Balanced => balanced_oracle(num_inputs, rng),
    }
}
