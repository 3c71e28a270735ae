//! Shared helpers for CLI commands.

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::ValueEnum;
use console::style;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use qutilities_adapter_sim::SimulatorBackend;
use qutilities_ir::{Counts, ExecutionBackend, GateSequence, OpaqueGate};

/// How a generated sequence is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable instruction listing.
    #[default]
    Text,
    /// OpenQASM 3 source.
    Qasm,
    /// JSON document.
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "qasm" | "qasm3" => Ok(OutputFormat::Qasm),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "unknown output format '{other}'. Available: text, qasm, json"
            )),
        }
    }
}

/// Resolved output options for one command.
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Destination file; stdout when unset.
    pub path: Option<PathBuf>,
}

impl OutputOptions {
    /// Write rendered text to the destination.
    pub fn write(&self, content: &str) -> Result<()> {
        match &self.path {
            Some(path) => {
                fs::write(path, content)
                    .with_context(|| format!("Failed to write file: {}", path.display()))?;
                eprintln!("{} Wrote {}", style("✓").green().bold(), style(path.display()).green());
            }
            None => print!("{content}"),
        }
        Ok(())
    }
}

/// Render a sequence in the requested format.
pub fn render_sequence(sequence: &GateSequence, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format!("{}{}\n", sequence, summary(sequence))),
        OutputFormat::Qasm => {
            qutilities_qasm3::emit(sequence).map_err(|e| anyhow::anyhow!("Emit error: {e}"))
        }
        OutputFormat::Json => {
            let mut json = sequence.to_json()?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Render an exported gate in the requested format.
///
/// QASM output defines the gate and applies it once to a fresh register.
pub fn render_gate(gate: &OpaqueGate, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => {
            let body = gate.to_sequence()?;
            Ok(format!("gate {}", render_sequence(&body, OutputFormat::Text)?))
        }
        OutputFormat::Qasm => {
            let mut wrapper = GateSequence::with_size(gate.label(), gate.num_qubits(), 0);
            let qubits: Vec<_> = wrapper.qubits().iter().map(|q| q.id).collect();
            wrapper.append_gate(gate, &qubits)?;
            render_sequence(&wrapper, OutputFormat::Qasm)
        }
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(gate)?;
            json.push('\n');
            Ok(json)
        }
    }
}

fn summary(sequence: &GateSequence) -> String {
    let counts = sequence
        .gate_counts()
        .into_iter()
        .map(|(name, n)| format!("{name}={n}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "  -- {} instructions, depth {} [{counts}]",
        sequence.len(),
        sequence.depth()
    )
}

/// Seeded generator, or one seeded from entropy.
pub fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Run a measured sequence on the statevector simulator.
pub fn simulate(sequence: &GateSequence, shots: u32, seed: Option<u64>) -> Result<Counts> {
    let mut backend = SimulatorBackend::new();
    if let Some(seed) = seed {
        backend = backend.with_seed(seed);
    }
    backend
        .run(sequence, shots)
        .with_context(|| format!("Simulation of '{}' failed", sequence.label()))
}

/// Print measurement counts as a table.
pub fn print_counts(counts: &Counts) {
    println!(
        "\n{} Results ({} shots):",
        style("✓").green().bold(),
        counts.total_shots()
    );

    let sorted = counts.sorted();
    let total = counts.total_shots() as f64;

    for (bitstring, count) in sorted.iter().take(16) {
        let prob = *count as f64 / total * 100.0;
        let bar_len = (prob / 2.0).round() as usize;
        let bar: String = "█".repeat(bar_len);

        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > 16 {
        println!("  ... and {} more outcomes", sorted.len() - 16);
    }
}
