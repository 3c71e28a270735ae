//! Job-file command implementation.
//!
//! A job file describes one generation request in YAML or JSON:
//!
//! ```yaml
//! format: qasm
//! job:
//!   kind: qft
//!   num_qubits: 4
//!   approximation_level: 1
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use qutilities_synth::QftConfig;

use super::common::{OutputFormat, OutputOptions};
use super::deutsch_jozsa::OracleChoice;
use super::qpe::QpeRequest;
use super::{deutsch, deutsch_jozsa, order_finding, qft, qpe};

/// A generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Job {
    /// Quantum Fourier transform.
    Qft(QftConfig),
    /// Phase estimation of a phase angle.
    Qpe(QpeRequest),
    /// Deutsch's problem.
    Deutsch {
        /// Function case, 1 through 4.
        case: u8,
    },
    /// Deutsch–Jozsa problem.
    DeutschJozsa {
        /// Number of input qubits.
        qubits: u32,
        /// Oracle kind; random when absent.
        #[serde(default)]
        oracle: Option<OracleChoice>,
    },
    /// Order finding.
    OrderFinding {
        /// Modulus `N`.
        modulus: u64,
        /// Base `a`; random when absent.
        #[serde(default)]
        base: Option<u64>,
        /// Insert barriers between stages.
        #[serde(default)]
        barriers: bool,
    },
}

/// Top level of a job file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobFile {
    /// Output format; falls back to the settings.
    #[serde(default)]
    pub format: Option<OutputFormat>,
    /// Export QFT or QPE as an opaque gate.
    #[serde(default)]
    pub gate: bool,
    /// Simulate with this many shots.
    #[serde(default)]
    pub shots: Option<u32>,
    /// Seed for random choices and sampling.
    #[serde(default)]
    pub seed: Option<u64>,
    /// The request.
    pub job: Job,
}

impl JobFile {
    /// Load a job file, choosing the parser by extension.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("File not found: {}", path.display());
        }
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext.to_lowercase().as_str() {
            "json" => serde_json::from_str(&source)
                .with_context(|| format!("Invalid JSON job file: {}", path.display())),
            _ => serde_yaml_ng::from_str(&source)
                .with_context(|| format!("Invalid YAML job file: {}", path.display())),
        }
    }
}

/// Execute the job command.
///
/// Values in the file override settings; explicit flags override both.
pub fn execute(
    path: &Path,
    defaults: &OutputOptions,
    flag_format: Option<OutputFormat>,
    default_seed: Option<u64>,
) -> Result<()> {
    let file = JobFile::load(path)?;
    let output = OutputOptions {
        format: flag_format.or(file.format).unwrap_or(defaults.format),
        path: defaults.path.clone(),
    };
    let seed = file.seed.or(default_seed);

    match file.job {
        Job::Qft(config) => qft::execute(config, file.gate, &output),
        Job::Qpe(request) => qpe::execute(&request, file.gate, file.shots, seed, &output),
        Job::Deutsch { case } => deutsch::execute(case, file.shots, seed, &output),
        Job::DeutschJozsa { qubits, oracle } => {
            deutsch_jozsa::execute(qubits, oracle, file.shots, seed, &output)
        }
        Job::OrderFinding {
            modulus,
            base,
            barriers,
        } => order_finding::execute(modulus, base, barriers, file.shots, seed, &output),
    }
}
