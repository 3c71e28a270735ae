//! End-to-end runs of the oracle algorithms on the statevector backend.

use proptest::prelude::*;
use qutilities_adapter_sim::SimulatorBackend;
use qutilities_algo::deutsch_jozsa::{
    balanced_oracle, balanced_oracle_from_states, constant_oracle,
};
use qutilities_algo::{DeutschFunction, FunctionClass, classify, compile_oracle_circuit};
use qutilities_ir::{ExecutionBackend, GateSequence};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn zero_probability(seq: &GateSequence) -> f64 {
    let width = seq.num_clbits() as usize;
    let dist = SimulatorBackend::new().distribution(seq).unwrap();
    dist.get(&"0".repeat(width)).copied().unwrap_or(0.0)
}

#[test]
fn deutsch_classifies_all_four_functions() {
    let backend = SimulatorBackend::new().with_seed(5);
    for f in DeutschFunction::ALL {
        let counts = backend.run(&f.circuit().unwrap(), 64).unwrap();
        assert_eq!(classify(&counts).unwrap(), f.class(), "{f}");
    }
}

#[test]
fn deutsch_outcomes_are_deterministic() {
    for f in DeutschFunction::ALL {
        let p0 = zero_probability(&f.circuit().unwrap());
        let expected = match f.class() {
            FunctionClass::Constant => 1.0,
            FunctionClass::Balanced => 0.0,
        };
        assert!((p0 - expected).abs() < 1e-9, "{f}: p(0) = {p0}");
    }
}

#[test]
fn constant_oracles_always_read_zero() {
    for n in 1..=5 {
        for output in [false, true] {
            let seq = compile_oracle_circuit(&constant_oracle(n, output).unwrap()).unwrap();
            assert!((zero_probability(&seq) - 1.0).abs() < 1e-9, "n={n} out={output}");
        }
    }
}

#[test]
fn balanced_oracle_is_classified_from_shots() {
    let mut rng = StdRng::seed_from_u64(42);
    let oracle = balanced_oracle(4, &mut rng).unwrap();
    let seq = compile_oracle_circuit(&oracle).unwrap();
    let counts = SimulatorBackend::new().with_seed(1).run(&seq, 128).unwrap();
    assert_eq!(counts.get("0000"), 0);
    assert_eq!(classify(&counts).unwrap(), FunctionClass::Balanced);
}

#[test]
fn parity_of_lowest_bit_reads_one_at_qubit_zero() {
    // f(x) = x_0 kicks back only onto input qubit 0.
    let oracle = balanced_oracle_from_states(3, &[1, 3, 5, 7]).unwrap();
    let seq = compile_oracle_circuit(&oracle).unwrap();
    let dist = SimulatorBackend::new().distribution(&seq).unwrap();
    assert!((dist["001"] - 1.0).abs() < 1e-9);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn random_balanced_oracles_never_read_zero(n in 1u32..=4, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let seq = compile_oracle_circuit(&balanced_oracle(n, &mut rng).unwrap()).unwrap();
        prop_assert!(zero_probability(&seq) < 1e-9);
    }
}
