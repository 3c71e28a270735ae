//! QFT command implementation.

use anyhow::Result;
use console::style;

use qutilities_synth::{QftConfig, QftGenerator};

use super::common::{OutputOptions, render_gate, render_sequence};

/// Execute the qft command.
pub fn execute(config: QftConfig, gate: bool, output: &OutputOptions) -> Result<()> {
    eprintln!(
        "{} Generating {} ({} qubits, approximation {})",
        style("→").cyan().bold(),
        style(config.label()).green(),
        config.num_qubits,
        config.approximation_level
    );

    let generator = QftGenerator::new(config);
    let content = if gate {
        render_gate(&generator.build_gate()?, output.format)?
    } else {
        render_sequence(&generator.build()?, output.format)?
    };
    output.write(&content)
}
