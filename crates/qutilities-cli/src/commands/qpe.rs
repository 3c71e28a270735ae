//! QPE command implementation.

use anyhow::Result;
use console::style;
use serde::{Deserialize, Serialize};

use qutilities_synth::{QpeComposer, QpeConfig};

use super::common::{OutputOptions, print_counts, render_gate, render_sequence, simulate};

/// Phase estimation of a single-qubit phase rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QpeRequest {
    /// Size of the counting register.
    pub control_qubits: u32,
    /// Size of the phase register.
    #[serde(default = "default_phase_qubits")]
    pub phase_qubits: u32,
    /// Phase as a fraction of a full turn.
    pub theta: f64,
    /// Prepare `|1⟩` on the first phase qubit.
    #[serde(default)]
    pub init_phase: bool,
    /// Insert barriers between stages.
    #[serde(default)]
    pub barriers: bool,
    /// Sequence label override.
    #[serde(default)]
    pub label: Option<String>,
}

fn default_phase_qubits() -> u32 {
    1
}

impl QpeRequest {
    /// Equivalent composer configuration.
    pub fn config(&self) -> QpeConfig {
        let config = QpeConfig::new(self.control_qubits, self.phase_qubits)
            .with_theta(self.theta)
            .with_init_phase(self.init_phase)
            .with_barriers(self.barriers);
        match &self.label {
            Some(label) => config.with_label(label.clone()),
            None => config,
        }
    }
}

/// Execute the qpe command.
pub fn execute(
    request: &QpeRequest,
    gate: bool,
    shots: Option<u32>,
    seed: Option<u64>,
    output: &OutputOptions,
) -> Result<()> {
    let composer = QpeComposer::new(request.config());
    eprintln!(
        "{} Composing {} with theta = {}",
        style("→").cyan().bold(),
        style(composer.config().label()).green(),
        request.theta
    );

    if gate {
        return output.write(&render_gate(&composer.build_gate()?, output.format)?);
    }

    let sequence = composer.build()?;
    output.write(&render_sequence(&sequence, output.format)?)?;

    if let Some(shots) = shots {
        let counts = simulate(&sequence, shots, seed)?;
        print_counts(&counts);
    }
    Ok(())
}
