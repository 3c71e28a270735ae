//! qutilities command-line interface.
//!
//! Generates QFT, QPE and algorithm circuits and prints them as an
//! instruction listing, OpenQASM 3 or JSON:
//!
//! ```text
//! qutil qft --qubits 4 --approximation 1 --format qasm
//! qutil qpe --control 3 --theta 0.25 --init-phase --run
//! qutil deutsch-jozsa --qubits 3 --oracle balanced --seed 7 --shots 256
//! qutil job request.yaml
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::common::{OutputFormat, OutputOptions};
use commands::deutsch_jozsa::OracleChoice;
use commands::qpe::QpeRequest;
use commands::{deutsch, deutsch_jozsa, job, order_finding, qft, qpe, version};
use config::Settings;
use qutilities_synth::QftConfig;

/// Shots used by `--run` when neither the flag nor the settings give a count.
const DEFAULT_SHOTS: u32 = 1024;

/// qutil - QFT and phase estimation circuit synthesis
#[derive(Parser)]
#[command(name = "qutil")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Settings file (defaults to ~/.qutilities/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    format: Option<OutputFormat>,

    /// Write output to a file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Simulation options shared by measured circuits.
#[derive(Args, Debug, Clone, Copy, Default)]
struct RunArgs {
    /// Simulate the circuit and print counts
    #[arg(long)]
    run: bool,

    /// Number of shots (implies --run)
    #[arg(short, long)]
    shots: Option<u32>,

    /// Seed for random choices and sampling
    #[arg(long)]
    seed: Option<u64>,
}

impl RunArgs {
    fn shots(&self, settings: &Settings) -> Option<u32> {
        (self.run || self.shots.is_some())
            .then(|| self.shots.or(settings.shots).unwrap_or(DEFAULT_SHOTS))
    }

    fn seed(&self, settings: &Settings) -> Option<u64> {
        self.seed.or(settings.seed)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a quantum Fourier transform
    Qft {
        /// Number of qubits
        #[arg(short, long)]
        qubits: u32,

        /// Generate the inverse transform
        #[arg(long)]
        inverse: bool,

        /// Omit the final qubit-reversal swaps
        #[arg(long)]
        no_swaps: bool,

        /// Drop the K smallest rotation distances
        #[arg(short, long, default_value = "0")]
        approximation: u32,

        /// Insert a barrier after each control qubit
        #[arg(long)]
        barriers: bool,

        /// Custom label
        #[arg(long)]
        label: Option<String>,

        /// Export as an opaque gate
        #[arg(long)]
        gate: bool,
    },

    /// Generate phase estimation of a phase rotation
    Qpe {
        /// Number of control (counting) qubits
        #[arg(short, long)]
        control: u32,

        /// Number of phase qubits
        #[arg(short, long, default_value = "1")]
        phase: u32,

        /// Phase as a fraction of a full turn
        #[arg(short, long, allow_hyphen_values = true)]
        theta: f64,

        /// Prepare |1⟩ on the first phase qubit
        #[arg(long)]
        init_phase: bool,

        /// Insert barriers between stages
        #[arg(long)]
        barriers: bool,

        /// Custom label
        #[arg(long)]
        label: Option<String>,

        /// Export as an opaque gate (no measurements)
        #[arg(long)]
        gate: bool,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Deutsch's algorithm on one of the four one-bit functions
    Deutsch {
        /// Function case (1: f=0, 2: f=x, 3: f=not x, 4: f=1)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
        case: u8,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Deutsch–Jozsa algorithm
    DeutschJozsa {
        /// Number of input qubits
        #[arg(short, long)]
        qubits: u32,

        /// Oracle kind (random when omitted)
        #[arg(long, value_enum)]
        oracle: Option<OracleChoice>,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Order finding by phase estimation of modular multiplication
    OrderFinding {
        /// Modulus N
        #[arg(short, long)]
        modulus: u64,

        /// Base a, coprime to N (random when omitted)
        #[arg(short, long)]
        base: Option<u64>,

        /// Insert barriers between stages
        #[arg(long)]
        barriers: bool,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Run a YAML or JSON job file
    Job {
        /// Job file
        file: PathBuf,

        /// Seed used when the file sets none
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref());

    // Setup logging
    let filter = settings
        .as_ref()
        .map_or_else(|_| Settings::default().log_filter(cli.verbose), |s| s.log_filter(cli.verbose));
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = settings.and_then(|settings| run(cli, &settings));

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

fn run(cli: Cli, settings: &Settings) -> Result<()> {
    let output = OutputOptions {
        format: cli.format.or(settings.format).unwrap_or_default(),
        path: cli.output,
    };

    match cli.command {
        Commands::Qft {
            qubits,
            inverse,
            no_swaps,
            approximation,
            barriers,
            label,
            gate,
        } => {
            let mut config = QftConfig::new(qubits)
                .with_inverse(inverse)
                .with_swaps(!no_swaps)
                .with_approximation(approximation)
                .with_barriers(barriers);
            if let Some(label) = label {
                config = config.with_label(label);
            }
            qft::execute(config, gate, &output)
        }

        Commands::Qpe {
            control,
            phase,
            theta,
            init_phase,
            barriers,
            label,
            gate,
            run,
        } => {
            let request = QpeRequest {
                control_qubits: control,
                phase_qubits: phase,
                theta,
                init_phase,
                barriers,
                label,
            };
            qpe::execute(
                &request,
                gate,
                run.shots(settings),
                run.seed(settings),
                &output,
            )
        }

        Commands::Deutsch { case, run } => {
            deutsch::execute(case, run.shots(settings), run.seed(settings), &output)
        }

        Commands::DeutschJozsa {
            qubits,
            oracle,
            run,
        } => deutsch_jozsa::execute(
            qubits,
            oracle,
            run.shots(settings),
            run.seed(settings),
            &output,
        ),

        Commands::OrderFinding {
            modulus,
            base,
            barriers,
            run,
        } => order_finding::execute(
            modulus,
            base,
            barriers,
            run.shots(settings),
            run.seed(settings),
            &output,
        ),

        Commands::Job { file, seed } => {
            job::execute(&file, &output, cli.format, seed.or(settings.seed))
        }

        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}
