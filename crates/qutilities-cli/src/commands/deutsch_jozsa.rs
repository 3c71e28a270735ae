//! Deutsch–Jozsa command implementation.

use anyhow::Result;
use clap::ValueEnum;
use console::style;
use rand::Rng;
use serde::{Deserialize, Serialize};

use qutilities_algo::deutsch_jozsa::oracle;
use qutilities_algo::{FunctionClass, classify, compile_oracle_circuit};

use super::common::{OutputOptions, print_counts, render_sequence, rng, simulate};

/// Oracle kind selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleChoice {
    /// Same output on every input.
    Constant,
    /// Output 1 on half of the inputs.
    Balanced,
}

impl From<OracleChoice> for FunctionClass {
    fn from(choice: OracleChoice) -> Self {
        match choice {
            OracleChoice::Constant => FunctionClass::Constant,
            OracleChoice::Balanced => FunctionClass::Balanced,
        }
    }
}

/// Execute the deutsch-jozsa command.
///
/// Without an explicit oracle kind one is drawn at random.
pub fn execute(
    qubits: u32,
    choice: Option<OracleChoice>,
    shots: Option<u32>,
    seed: Option<u64>,
    output: &OutputOptions,
) -> Result<()> {
    let mut rng = rng(seed);
    let class = match choice {
        Some(choice) => FunctionClass::from(choice),
        None => {
            if rng.r#gen::<bool>() {
                FunctionClass::Balanced
            } else {
                FunctionClass::Constant
            }
        }
    };
    eprintln!(
        "{} Deutsch–Jozsa over {} inputs with a {} oracle",
        style("→").cyan().bold(),
        qubits,
        style(class).green()
    );

    let sequence = compile_oracle_circuit(&oracle(qubits, class, &mut rng)?)?;
    output.write(&render_sequence(&sequence, output.format)?)?;

    if let Some(shots) = shots {
        let counts = simulate(&sequence, shots, seed)?;
        print_counts(&counts);
        println!(
            "\n  Function is {} (expected {})",
            style(classify(&counts)?).yellow().bold(),
            class
        );
    }
    Ok(())
}
