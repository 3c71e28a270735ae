//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - quantum Fourier transform and phase estimation synthesis",
        style("qutil").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qutilities-ir     Gate sequences, opaque gates, unitary handles");
    println!("  qutilities-synth  QFT and QPE generators");
    println!("  qutilities-algo   Deutsch, Deutsch–Jozsa and order finding");
    println!("  qutilities-qasm3  OpenQASM 3 emitter");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
