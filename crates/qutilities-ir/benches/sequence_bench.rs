//! Benchmarks for gate-sequence operations
//!
//! Run with: cargo bench -p qutilities-ir

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qutilities_ir::{GateSequence, QubitId};
use std::f64::consts::PI;

fn ladder(n: u32) -> GateSequence {
    let mut seq = GateSequence::with_size("ladder", n, 0);
    for c in (0..n).rev() {
        seq.h(QubitId(c)).unwrap();
        for t in (0..c).rev() {
            seq.cp(PI / f64::from(1u32 << (c - t).min(30)), QubitId(c), QubitId(t))
                .unwrap();
        }
    }
    seq
}

/// Benchmark adding gates to a sequence
fn bench_gate_addition(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_addition");

    group.bench_function("h_gate", |b| {
        let mut seq = GateSequence::with_size("bench", 10, 0);
        b.iter(|| {
            seq.h(black_box(QubitId(0))).unwrap();
        });
    });

    group.bench_function("cp_gate", |b| {
        let mut seq = GateSequence::with_size("bench", 10, 0);
        b.iter(|| {
            seq.cp(black_box(PI / 4.0), black_box(QubitId(3)), black_box(QubitId(1)))
                .unwrap();
        });
    });

    group.finish();
}

/// Benchmark composing one sequence into another
fn bench_compose(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose");

    for n in &[4u32, 8, 16, 32] {
        let inner = ladder(*n);
        group.bench_with_input(BenchmarkId::new("append_at", n), n, |b, &n| {
            b.iter(|| {
                let mut outer = GateSequence::with_size("outer", n + 2, 0);
                outer.append_at(black_box(&inner), 1).unwrap();
                outer
            });
        });
    }

    group.finish();
}

/// Benchmark depth calculation
fn bench_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("depth");

    for n in &[8u32, 16, 32, 64] {
        let seq = ladder(*n);
        group.bench_with_input(BenchmarkId::new("ladder", n), &seq, |b, seq| {
            b.iter(|| black_box(seq).depth());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_gate_addition, bench_compose, bench_depth);
criterion_main!(benches);
