//! End-to-end tests of the `qutil` binary.

use std::fs;
use std::process::{Command, Output};

fn qutil(args: &[&str]) -> Output {
    let home = tempfile::tempdir().unwrap();
    Command::new(env!("CARGO_BIN_EXE_qutil"))
        .args(args)
        .env("HOME", home.path())
        .env_remove("QUTIL_LOG")
        .env_remove("QUTIL_FORMAT")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

// ============================================================================
// Generation
// ============================================================================

#[test]
fn test_qft_text() {
    let out = stdout(&qutil(&["qft", "--qubits", "3"]));
    assert!(out.starts_with("QFT (3) (3 qubits, 0 clbits)"));
    assert!(out.contains("cp=3"));
    assert!(out.contains("swap=1"));
}

#[test]
fn test_qft_qasm() {
    let out = stdout(&qutil(&["qft", "-q", "2", "--format", "qasm"]));
    assert!(out.starts_with("OPENQASM 3.0;"));
    assert!(out.contains("cp(pi/2) q[1], q[0];"));
    assert!(out.contains("swap q[0], q[1];"));
}

#[test]
fn test_qft_gate_json() {
    let out = stdout(&qutil(&["qft", "-q", "3", "--inverse", "--gate", "-f", "json"]));
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["label"], "QFT† (3)");
    assert_eq!(value["num_qubits"], 3);
}

#[test]
fn test_qpe_json_round_trips() {
    let out = stdout(&qutil(&["qpe", "-c", "3", "-t", "0.25", "-f", "json"]));
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["label"], "QPE (3 ⊗ 1)");
    assert_eq!(value["qubits"].as_array().unwrap().len(), 4);
}

#[test]
fn test_qpe_run_reads_phase() {
    let out = stdout(&qutil(&[
        "qpe",
        "-c",
        "3",
        "-t",
        "0.25",
        "--init-phase",
        "--shots",
        "64",
        "--seed",
        "1",
    ]));
    assert!(out.contains("Results (64 shots)"));
    assert!(out.contains("010"));
}

#[test]
fn test_deutsch_run_classifies() {
    let out = stdout(&qutil(&["deutsch", "--case", "3", "--run", "--seed", "2"]));
    assert!(out.contains("Function is balanced"));
}

#[test]
fn test_deutsch_jozsa_constant() {
    let out = stdout(&qutil(&[
        "deutsch-jozsa",
        "-q",
        "3",
        "--oracle",
        "constant",
        "-s",
        "32",
    ]));
    assert!(out.contains("Function is constant"));
}

#[test]
fn test_order_finding_with_base() {
    let out = stdout(&qutil(&["order-finding", "-m", "15", "-b", "7"]));
    assert!(out.starts_with("Order finding (7 mod 15) (12 qubits, 8 clbits)"));
}

#[test]
fn test_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("qft.qasm");
    let out = stdout(&qutil(&[
        "qft",
        "-q",
        "4",
        "-f",
        "qasm",
        "-o",
        path.to_str().unwrap(),
    ]));
    assert!(out.is_empty());
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("qubit[4] q;"));
}

// ============================================================================
// Settings and job files
// ============================================================================

#[test]
fn test_config_file_sets_format() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.yaml");
    fs::write(&config, "format: qasm\n").unwrap();

    let out = stdout(&qutil(&[
        "--config",
        config.to_str().unwrap(),
        "qft",
        "-q",
        "2",
    ]));
    assert!(out.starts_with("OPENQASM 3.0;"));

    // Flags win over the file.
    let out = stdout(&qutil(&[
        "--config",
        config.to_str().unwrap(),
        "qft",
        "-q",
        "2",
        "-f",
        "text",
    ]));
    assert!(out.starts_with("QFT (2)"));
}

#[test]
fn test_job_file_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let job = dir.path().join("job.yaml");
    fs::write(
        &job,
        "format: qasm\njob:\n  kind: qpe\n  control_qubits: 2\n  theta: 0.5\n",
    )
    .unwrap();

    let out = stdout(&qutil(&["job", job.to_str().unwrap()]));
    assert!(out.contains("// QPE (2 ⊗ 1)"));
    assert!(out.contains("c[1] = measure q[1];"));
}

#[test]
fn test_job_file_json_deutsch_jozsa() {
    let dir = tempfile::tempdir().unwrap();
    let job = dir.path().join("job.json");
    fs::write(
        &job,
        r#"{"seed": 5, "shots": 16, "job": {"kind": "deutsch-jozsa", "qubits": 2, "oracle": "balanced"}}"#,
    )
    .unwrap();

    let out = stdout(&qutil(&["job", job.to_str().unwrap()]));
    assert!(out.contains("Function is balanced"));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_invalid_qft_fails() {
    let output = qutil(&["qft", "-q", "3", "-a", "3"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
}

#[test]
fn test_theta_with_two_phase_qubits_fails() {
    let output = qutil(&["qpe", "-c", "3", "-p", "2", "-t", "0.1"]);
    assert!(!output.status.success());
}

#[test]
fn test_missing_job_file_fails() {
    let output = qutil(&["job", "/nonexistent/job.yaml"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("File not found"));
}

#[test]
fn test_bad_format_env_fails() {
    let home = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_qutil"))
        .args(["qft", "-q", "2"])
        .env("HOME", home.path())
        .env("QUTIL_FORMAT", "yaml")
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("QUTIL_FORMAT"));
}

#[test]
fn test_version() {
    let out = stdout(&qutil(&["version"]));
    assert!(out.contains("qutil"));
}
