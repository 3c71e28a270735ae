//! Deutsch command implementation.

use anyhow::Result;
use console::style;

use qutilities_algo::{DeutschFunction, classify};

use super::common::{OutputOptions, print_counts, render_sequence, simulate};

/// Execute the deutsch command.
pub fn execute(
    case: u8,
    shots: Option<u32>,
    seed: Option<u64>,
    output: &OutputOptions,
) -> Result<()> {
    let function = DeutschFunction::from_case(case)?;
    eprintln!(
        "{} Deutsch case {}: {}",
        style("→").cyan().bold(),
        case,
        style(function).green()
    );

    let sequence = function.circuit()?;
    output.write(&render_sequence(&sequence, output.format)?)?;

    if let Some(shots) = shots {
        let counts = simulate(&sequence, shots, seed)?;
        print_counts(&counts);
        println!(
            "\n  Function is {} (expected {})",
            style(classify(&counts)?).yellow().bold(),
            function.class()
        );
    }
    Ok(())
}
