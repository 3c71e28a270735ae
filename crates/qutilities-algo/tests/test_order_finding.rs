//! Order-finding distributions for small moduli.

use qutilities_adapter_sim::SimulatorBackend;
use qutilities_algo::{AlgoError, OrderFinding};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn peaks(modulus: u64, base: u64) -> Vec<(String, f64)> {
    let circuit = OrderFinding::new(modulus).with_base(base).build().unwrap();
    SimulatorBackend::new()
        .distribution(&circuit.sequence)
        .unwrap()
        .into_iter()
        .filter(|(_, p)| *p > 1e-9)
        .collect()
}

fn assert_peaks(actual: &[(String, f64)], expected: &[(&str, f64)]) {
    assert_eq!(actual.len(), expected.len(), "{actual:?}");
    for ((bits, p), (want_bits, want_p)) in actual.iter().zip(expected) {
        assert_eq!(bits, want_bits);
        assert!((p - want_p).abs() < 1e-9, "{bits}: {p}");
    }
}

#[test]
fn order_of_7_mod_15_is_four() {
    assert_peaks(
        &peaks(15, 7),
        &[
            ("00000000", 0.25),
            ("01000000", 0.25),
            ("10000000", 0.25),
            ("11000000", 0.25),
        ],
    );
}

#[test]
fn order_of_4_mod_15_is_two() {
    assert_peaks(&peaks(15, 4), &[("00000000", 0.5), ("10000000", 0.5)]);
}

#[test]
fn seeded_builds_pick_the_same_base() {
    let a = OrderFinding::new(21)
        .build_with_rng(&mut StdRng::seed_from_u64(9))
        .unwrap();
    let b = OrderFinding::new(21)
        .build_with_rng(&mut StdRng::seed_from_u64(9))
        .unwrap();
    assert_eq!(a.base, b.base);
    assert_eq!(a.sequence, b.sequence);
}

#[test]
fn non_coprime_base_is_rejected() {
    assert!(matches!(
        OrderFinding::new(15).with_base(6).build(),
        Err(AlgoError::InvalidBase { .. })
    ));
}

#[test]
fn oversized_modulus_is_rejected() {
    assert!(matches!(
        OrderFinding::new(1 << 20).build(),
        Err(AlgoError::InvalidModulus { .. })
    ));
}
