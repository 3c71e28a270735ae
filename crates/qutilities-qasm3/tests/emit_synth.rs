//! Emitting synthesized QFT and QPE sequences.

use proptest::prelude::*;
use qutilities_ir::{GateSequence, QubitId};
use qutilities_qasm3::{EmitError, emit};
use qutilities_synth::{QftConfig, QftGenerator, QpeComposer, QpeConfig};

#[test]
fn qft_rotations_print_as_pi_fractions() {
    let seq = QftGenerator::new(QftConfig::new(4)).build().unwrap();
    let qasm = emit(&seq).unwrap();

    assert!(qasm.contains("// QFT (4)"));
    assert!(qasm.contains("h q[3];"));
    assert!(qasm.contains("cp(pi/2) q[3], q[2];"));
    assert!(qasm.contains("cp(pi/4) q[3], q[1];"));
    assert!(qasm.contains("cp(pi/8) q[3], q[0];"));
    assert!(qasm.contains("swap q[0], q[3];"));
}

#[test]
fn inverse_qft_rotations_are_negative() {
    let seq = QftGenerator::new(QftConfig::new(3).with_inverse(true))
        .build()
        .unwrap();
    let qasm = emit(&seq).unwrap();
    assert!(qasm.contains("cp(-pi/2) q[1], q[0];"));
    assert!(qasm.contains("cp(-pi/4) q[2], q[0];"));
}

#[test]
fn qpe_measures_into_result_bits() {
    let seq = QpeComposer::new(QpeConfig::new(3, 1).with_theta(0.25).with_init_phase(true))
        .build()
        .unwrap();
    let qasm = emit(&seq).unwrap();

    assert!(qasm.contains("qubit[4] q;"));
    assert!(qasm.contains("bit[3] c;"));
    assert!(qasm.contains("x q[3];"));
    assert!(qasm.contains("cp(pi/2) q[0], q[3];"));
    assert!(qasm.contains("cp(pi) q[1], q[3];"));
    assert!(qasm.contains("cp(2*pi) q[2], q[3];"));
    assert!(qasm.contains("c[2] = measure q[2];"));
}

#[test]
fn embedded_qft_gate_is_defined_once() {
    let gate = QftGenerator::new(QftConfig::new(2)).build_gate().unwrap();
    let mut seq = GateSequence::with_size("two blocks", 4, 0);
    seq.append_gate(&gate, &[QubitId(0), QubitId(1)]).unwrap();
    seq.append_gate(&gate, &[QubitId(2), QubitId(3)]).unwrap();

    let qasm = emit(&seq).unwrap();
    assert_eq!(qasm.matches("gate qft_2 a0, a1 {").count(), 1);
    assert!(qasm.contains("    cp(pi/2) a1, a0;"));
    assert!(qasm.contains("qft_2 q[2], q[3];"));
}

#[test]
fn permutation_unitary_is_rejected() {
    use qutilities_ir::{ControlledPower, UnitaryDefinition, UnitaryRef};

    let mut seq = GateSequence::with_size("perm", 2, 0);
    let cp = ControlledPower {
        unitary: UnitaryRef {
            name: "flip".into(),
            num_qubits: 1,
            definition: UnitaryDefinition::Permutation(vec![1, 0]),
        },
        power: 1,
        num_controls: 1,
    };
    seq.controlled_power(cp, &[QubitId(0)], &[QubitId(1)]).unwrap();
    assert!(matches!(
        emit(&seq),
        Err(EmitError::UnsupportedDefinition { .. })
    ));
}

proptest! {
    #[test]
    fn every_gate_becomes_one_statement(n in 1u32..=8, k_frac in 0.0f64..1.0) {
        let k = ((n - 1) as f64 * k_frac) as u32;
        let seq = QftGenerator::new(QftConfig::new(n).with_approximation(k)).build().unwrap();
        let qasm = emit(&seq).unwrap();
        let body_lines = qasm
            .lines()
            .skip_while(|l| !l.starts_with("qubit["))
            .skip(2)
            .filter(|l| !l.is_empty())
            .count();
        prop_assert_eq!(body_lines, seq.len());
    }
}
