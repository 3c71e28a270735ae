//! Order-finding command implementation.

use anyhow::Result;
use console::style;

use qutilities_algo::OrderFinding;

use super::common::{OutputOptions, print_counts, render_sequence, rng, simulate};

/// Execute the order-finding command.
pub fn execute(
    modulus: u64,
    base: Option<u64>,
    barriers: bool,
    shots: Option<u32>,
    seed: Option<u64>,
    output: &OutputOptions,
) -> Result<()> {
    let mut builder = OrderFinding::new(modulus).with_barriers(barriers);
    if let Some(base) = base {
        builder = builder.with_base(base);
    }
    let circuit = builder.build_with_rng(&mut rng(seed))?;
    eprintln!(
        "{} Order finding modulo {} with base {} ({} qubits)",
        style("→").cyan().bold(),
        modulus,
        style(circuit.base).green(),
        circuit.sequence.num_qubits()
    );

    output.write(&render_sequence(&circuit.sequence, output.format)?)?;

    if let Some(shots) = shots {
        let counts = simulate(&circuit.sequence, shots, seed)?;
        print_counts(&counts);
    }
    Ok(())
}
