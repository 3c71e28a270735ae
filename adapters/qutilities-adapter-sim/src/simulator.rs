//! Simulator backend implementation.

use std::collections::BTreeMap;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

use qutilities_ir::{Counts, ExecutionBackend, GateSequence, InstructionKind, QubitId};

use crate::error::{SimError, SimResult};
use crate::statevector::Statevector;

/// Local statevector backend.
///
/// Measurements must be terminal: each measured qubit may not be touched
/// again afterwards. Shots are sampled from the exact final distribution.
#[derive(Debug, Clone)]
pub struct SimulatorBackend {
    /// Maximum number of qubits supported.
    max_qubits: u32,
    /// Seed for shot sampling; fresh entropy per run when absent.
    seed: Option<u64>,
}

impl SimulatorBackend {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self {
            max_qubits: 20,
            seed: None,
        }
    }

    /// Create a simulator with custom max qubits.
    #[must_use]
    pub fn with_max_qubits(mut self, max_qubits: u32) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Make shot sampling reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Final statevector of `sequence`, with measurements deferred.
    pub fn statevector(&self, sequence: &GateSequence) -> SimResult<Statevector> {
        self.check_width(sequence)?;
        let mut sv = Statevector::new(sequence.num_qubits() as usize);
        sv.evolve(sequence)?;
        Ok(sv)
    }

    /// Exact probability of every measured bitstring with nonzero weight.
    ///
    /// Bitstrings put classical bit 0 rightmost.
    #[instrument(skip(self, sequence), fields(label = sequence.label()))]
    pub fn distribution(&self, sequence: &GateSequence) -> SimResult<BTreeMap<String, f64>> {
        let measured = terminal_measurements(sequence)?;
        let sv = self.statevector(sequence)?;
        let width = sequence.num_clbits() as usize;

        let mut distribution = BTreeMap::new();
        for (index, p) in sv.probabilities().into_iter().enumerate() {
            if p < 1e-12 {
                continue;
            }
            *distribution
                .entry(bitstring(index, &measured, width))
                .or_insert(0.0) += p;
        }
        debug!(outcomes = distribution.len(), "distribution computed");
        Ok(distribution)
    }

    fn check_width(&self, sequence: &GateSequence) -> SimResult<()> {
        if sequence.num_qubits() > self.max_qubits {
            return Err(SimError::TooManyQubits {
                requested: sequence.num_qubits(),
                max: self.max_qubits,
            });
        }
        Ok(())
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionBackend for SimulatorBackend {
    type Error = SimError;

    fn name(&self) -> &str {
        "statevector"
    }

    #[instrument(skip(self, sequence), fields(label = sequence.label()))]
    fn run(&self, sequence: &GateSequence, shots: u32) -> SimResult<Counts> {
        let start = Instant::now();
        debug!(
            num_qubits = sequence.num_qubits(),
            shots, "starting simulation"
        );

        let outcomes: Vec<(String, f64)> = self.distribution(sequence)?.into_iter().collect();
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut counts = Counts::new();
        for _ in 0..shots {
            let r: f64 = rng.r#gen();
            let mut cumulative = 0.0;
            let mut chosen = outcomes.last().map(|(b, _)| b.as_str());
            for (bits, p) in &outcomes {
                cumulative += p;
                if r < cumulative {
                    chosen = Some(bits.as_str());
                    break;
                }
            }
            if let Some(bits) = chosen {
                counts.insert(bits, 1);
            }
        }

        debug!("simulation completed in {:?}", start.elapsed());
        Ok(counts)
    }
}

/// `(qubit, clbit)` pairs of every measurement, rejecting reuse of a
/// measured qubit.
fn terminal_measurements(sequence: &GateSequence) -> SimResult<Vec<(QubitId, u32)>> {
    let mut measured: Vec<(QubitId, u32)> = Vec::new();
    for inst in sequence.instructions() {
        if let Some(&q) = inst
            .qubits
            .iter()
            .find(|q| measured.iter().any(|(m, _)| m == *q))
        {
            if !inst.is_barrier() {
                return Err(SimError::MidCircuitMeasurement(q));
            }
        }
        if matches!(inst.kind, InstructionKind::Measure) {
            for (q, c) in inst.qubits.iter().zip(&inst.clbits) {
                measured.push((*q, c.0));
            }
        }
    }
    Ok(measured)
}

fn bitstring(index: usize, measured: &[(QubitId, u32)], width: usize) -> String {
    let mut bits = vec!['0'; width];
    for &(q, c) in measured {
        if (index >> q.0) & 1 == 1 {
            // Classical bit 0 is the rightmost character.
            bits[width - 1 - c as usize] = '1';
        }
    }
    bits.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use qutilities_ir::ClbitId;

    fn bell() -> GateSequence {
        let mut seq = GateSequence::with_size("bell", 2, 2);
        seq.h(QubitId(0)).unwrap();
        seq.cx(QubitId(0), QubitId(1)).unwrap();
        seq.measure(QubitId(0), ClbitId(0)).unwrap();
        seq.measure(QubitId(1), ClbitId(1)).unwrap();
        seq
    }

    #[test]
    fn test_bell_state() {
        let backend = SimulatorBackend::new().with_seed(42);
        let counts = backend.run(&bell(), 1000).unwrap();
        assert_eq!(counts.get("00") + counts.get("11"), 1000);
        assert_eq!(counts.get("01") + counts.get("10"), 0);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let backend = SimulatorBackend::new().with_seed(9);
        assert_eq!(
            backend.run(&bell(), 200).unwrap(),
            backend.run(&bell(), 200).unwrap()
        );
    }

    #[test]
    fn test_bit_zero_is_rightmost() {
        let mut seq = GateSequence::with_size("one", 3, 3);
        seq.x(QubitId(0)).unwrap();
        for i in 0..3 {
            seq.measure(QubitId(i), ClbitId(i)).unwrap();
        }
        let dist = SimulatorBackend::new().distribution(&seq).unwrap();
        assert_eq!(dist.len(), 1);
        assert!((dist["001"] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_unmeasured_qubits_are_traced_out() {
        let mut seq = GateSequence::with_size("partial", 2, 1);
        seq.h(QubitId(1)).unwrap();
        seq.x(QubitId(0)).unwrap();
        seq.measure(QubitId(0), ClbitId(0)).unwrap();
        let dist = SimulatorBackend::new().distribution(&seq).unwrap();
        assert!((dist["1"] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_mid_circuit_measurement_rejected() {
        let mut seq = GateSequence::with_size("mid", 1, 1);
        seq.measure(QubitId(0), ClbitId(0)).unwrap();
        seq.h(QubitId(0)).unwrap();
        assert!(matches!(
            SimulatorBackend::new().run(&seq, 10),
            Err(SimError::MidCircuitMeasurement(QubitId(0)))
        ));
    }

    #[test]
    fn test_too_many_qubits() {
        let seq = GateSequence::with_size("wide", 5, 0);
        let backend = SimulatorBackend::new().with_max_qubits(4);
        assert!(matches!(
            backend.statevector(&seq),
            Err(SimError::TooManyQubits {
                requested: 5,
                max: 4
            })
        ));
    }
}
