//! Statevector simulation engine.

use num_complex::Complex64;
use rand::Rng;

use qutilities_ir::{
    ControlledPower, Gate, GateSequence, Instruction, InstructionKind, QubitId, StandardGate,
    UnitaryDefinition,
};

use crate::error::{SimError, SimResult};

/// A pure state over `num_qubits` qubits. Qubit `i` is bit `i` of the
/// amplitude index.
#[derive(Debug, Clone)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        Self::basis(num_qubits, 0)
    }

    /// Create the computational basis state `|index⟩`.
    pub fn basis(num_qubits: usize, index: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[index % size] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Wrap raw amplitudes. The length must be a power of two.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> SimResult<Self> {
        let len = amplitudes.len();
        if len == 0 || !len.is_power_of_two() {
            return Err(SimError::InvalidDimension(len));
        }
        Ok(Self {
            num_qubits: len.trailing_zeros() as usize,
            amplitudes,
        })
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The amplitudes, indexed by basis state.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Born-rule probabilities, indexed by basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// `⟨self|other⟩`.
    pub fn inner_product(&self, other: &Statevector) -> Complex64 {
        self.amplitudes
            .iter()
            .zip(&other.amplitudes)
            .map(|(a, b)| a.conj() * b)
            .sum()
    }

    /// `|⟨self|other⟩|²`; 1 when the states agree up to a global phase.
    pub fn fidelity(&self, other: &Statevector) -> f64 {
        self.inner_product(other).norm_sqr()
    }

    /// Apply every instruction of `sequence` in order.
    ///
    /// Measurements are deferred and barriers have no effect.
    pub fn evolve(&mut self, sequence: &GateSequence) -> SimResult<()> {
        for inst in sequence.instructions() {
            self.apply(inst)?;
        }
        Ok(())
    }

    /// Apply an instruction to the statevector.
    pub fn apply(&mut self, instruction: &Instruction) -> SimResult<()> {
        let qubits: Vec<usize> = instruction.qubits.iter().map(|q| q.0 as usize).collect();
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let expected = gate.num_qubits() as usize;
                if expected != qubits.len() {
                    return Err(SimError::OperandMismatch {
                        name: gate.name().to_string(),
                        expected,
                        got: qubits.len(),
                    });
                }
                self.apply_gate(gate, &qubits)
            }
            InstructionKind::Measure | InstructionKind::Barrier => Ok(()),
        }
    }

    fn apply_gate(&mut self, gate: &Gate, qubits: &[usize]) -> SimResult<()> {
        match gate {
            Gate::Standard(std_gate) => {
                self.apply_standard_gate(std_gate, qubits);
                Ok(())
            }
            Gate::Opaque(opaque) => self.apply_body(opaque.instructions(), qubits),
            Gate::ControlledPower(cp) => self.apply_controlled_power(cp, qubits),
        }
    }

    /// Apply a standard gate.
    fn apply_standard_gate(&mut self, gate: &StandardGate, qubits: &[usize]) {
        match gate {
            StandardGate::H => self.apply_h(qubits[0]),
            StandardGate::X => self.apply_x(qubits[0]),
            StandardGate::CX => self.apply_mcx(&qubits[..1], qubits[1]),
            StandardGate::CP(theta) => self.apply_cp(qubits[0], qubits[1], *theta),
            StandardGate::Swap => self.apply_swap(qubits[0], qubits[1]),
            StandardGate::MCX(n) => {
                let n = *n as usize;
                self.apply_mcx(&qubits[..n], qubits[n]);
            }
        }
    }

    /// Apply a gate body whose local qubit `i` is `qubits[i]`.
    fn apply_body(&mut self, body: &[Instruction], qubits: &[usize]) -> SimResult<()> {
        for inst in body {
            let mapped = inst.remapped(|q| QubitId(qubits[q.0 as usize] as u32), |c| c);
            self.apply(&mapped)?;
        }
        Ok(())
    }

    fn apply_controlled_power(&mut self, cp: &ControlledPower, qubits: &[usize]) -> SimResult<()> {
        let (controls, targets) = qubits.split_at(cp.num_controls as usize);
        let control_mask = controls.iter().fold(0usize, |m, &q| m | (1 << q));

        match &cp.unitary.definition {
            UnitaryDefinition::Gates(body) => {
                // The body never touches the controls, so evolving a copy and
                // keeping only the control-satisfied half is exact.
                let mut evolved = self.clone();
                evolved.apply_body(body, targets)?;
                for (i, amp) in self.amplitudes.iter_mut().enumerate() {
                    if i & control_mask == control_mask {
                        *amp = evolved.amplitudes[i];
                    }
                }
                Ok(())
            }
            UnitaryDefinition::Permutation(table) => {
                let expected = 1usize << targets.len();
                if table.len() != expected {
                    return Err(SimError::InvalidPermutation {
                        name: cp.unitary.name.clone(),
                        expected,
                        got: table.len(),
                    });
                }
                let mut next = self.amplitudes.clone();
                for (i, &amp) in self.amplitudes.iter().enumerate() {
                    if i & control_mask != control_mask {
                        continue;
                    }
                    let x = gather(i, targets);
                    let y = (table[x] as usize) % expected;
                    next[scatter(i, targets, y)] = amp;
                }
                self.amplitudes = next;
                Ok(())
            }
        }
    }

    // =========================================================================
    // Gate implementations
    // =========================================================================

    /// Apply Pauli-X to `qubit`.
    pub fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    /// Apply Hadamard to `qubit`.
    pub fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    /// Apply controlled phase `theta` between `control` and `target`.
    pub fn apply_cp(&mut self, control: usize, target: usize, theta: f64) {
        let mask = (1 << control) | (1 << target);
        let phase = Complex64::from_polar(1.0, theta);
        for i in 0..(1 << self.num_qubits) {
            if i & mask == mask {
                self.amplitudes[i] *= phase;
            }
        }
    }

    /// Swap `q1` and `q2`.
    pub fn apply_swap(&mut self, q1: usize, q2: usize) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        for i in 0..(1 << self.num_qubits) {
            if i & mask1 != 0 && i & mask2 == 0 {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    /// Flip `target` when every control is set.
    pub fn apply_mcx(&mut self, controls: &[usize], target: usize) {
        let control_mask = controls.iter().fold(0usize, |m, &q| m | (1 << q));
        let target_mask = 1 << target;
        for i in 0..(1 << self.num_qubits) {
            if i & control_mask == control_mask && i & target_mask == 0 {
                self.amplitudes.swap(i, i | target_mask);
            }
        }
    }

    // =========================================================================
    // Sampling
    // =========================================================================

    /// Draw one basis state according to the Born rule.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        let r: f64 = rng.r#gen();

        let mut cumulative = 0.0;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            cumulative += amp.norm_sqr();
            if r < cumulative {
                return i;
            }
        }

        // Rounding can leave the total just under 1.
        self.amplitudes.len() - 1
    }
}

/// Read the bits of `index` at `positions` into a little-endian integer.
fn gather(index: usize, positions: &[usize]) -> usize {
    positions
        .iter()
        .enumerate()
        .fold(0, |acc, (bit, &q)| acc | (((index >> q) & 1) << bit))
}

/// Overwrite the bits of `index` at `positions` with the bits of `value`.
fn scatter(index: usize, positions: &[usize], value: usize) -> usize {
    positions.iter().enumerate().fold(index, |acc, (bit, &q)| {
        (acc & !(1 << q)) | (((value >> bit) & 1) << q)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use qutilities_ir::{GateUnitary, UnitaryHandle, UnitaryRef};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::f64::consts::PI;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(1.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(0.0, 0.0)));
    }

    #[test]
    fn test_hadamard() {
        let mut sv = Statevector::new(1);
        sv.apply_h(0);

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(sqrt2_inv, 0.0)));
    }

    #[test]
    fn test_bell_state() {
        let mut sv = Statevector::new(2);
        sv.apply_h(0);
        sv.apply_mcx(&[0], 1);

        let p = sv.probabilities();
        assert!((p[0] - 0.5).abs() < 1e-10);
        assert!((p[3] - 0.5).abs() < 1e-10);
        assert!(p[1].abs() < 1e-10 && p[2].abs() < 1e-10);
    }

    #[test]
    fn test_cp_phase() {
        let mut sv = Statevector::basis(2, 0b11);
        sv.apply_cp(1, 0, PI / 2.0);
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(0.0, 1.0)));
    }

    #[test]
    fn test_swap() {
        let mut sv = Statevector::basis(3, 0b001);
        sv.apply_swap(0, 2);
        assert!(approx_eq(sv.amplitudes[0b100], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_mcx_needs_all_controls() {
        let mut sv = Statevector::basis(3, 0b001);
        sv.apply_mcx(&[0, 1], 2);
        assert!(approx_eq(sv.amplitudes[0b001], Complex64::new(1.0, 0.0)));

        let mut sv = Statevector::basis(3, 0b011);
        sv.apply_mcx(&[0, 1], 2);
        assert!(approx_eq(sv.amplitudes[0b111], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_opaque_gate_remaps_operands() {
        let mut inner = GateSequence::with_size("flip", 1, 0);
        inner.x(QubitId(0)).unwrap();
        let gate = inner.to_gate().unwrap();

        let mut sv = Statevector::new(3);
        sv.apply(&Instruction::gate(gate, [QubitId(2)])).unwrap();
        assert!(approx_eq(sv.amplitudes[0b100], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_controlled_gate_power() {
        let mut inner = GateSequence::with_size("X", 1, 0);
        inner.x(QubitId(0)).unwrap();
        let unitary = GateUnitary::new(inner.to_gate().unwrap());

        // X^3 = X, applied only when the control is set.
        let cp = ControlledPower {
            unitary: unitary.power(3).unwrap(),
            power: 3,
            num_controls: 1,
        };
        let inst = Instruction::gate(cp, [QubitId(0), QubitId(1)]);

        let mut off = Statevector::basis(2, 0b00);
        off.apply(&inst).unwrap();
        assert!(approx_eq(off.amplitudes[0b00], Complex64::new(1.0, 0.0)));

        let mut on = Statevector::basis(2, 0b01);
        on.apply(&inst).unwrap();
        assert!(approx_eq(on.amplitudes[0b11], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_controlled_permutation() {
        // Cyclic increment on two target qubits.
        let cp = ControlledPower {
            unitary: UnitaryRef {
                name: "inc".into(),
                num_qubits: 2,
                definition: UnitaryDefinition::Permutation(vec![1, 2, 3, 0]),
            },
            power: 1,
            num_controls: 1,
        };
        let inst = Instruction::gate(cp, [QubitId(0), QubitId(1), QubitId(2)]);

        // control=1, targets hold 3 -> 0
        let mut sv = Statevector::basis(3, 0b111);
        sv.apply(&inst).unwrap();
        assert!(approx_eq(sv.amplitudes[0b001], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_bad_permutation_length() {
        let cp = ControlledPower {
            unitary: UnitaryRef {
                name: "short".into(),
                num_qubits: 2,
                definition: UnitaryDefinition::Permutation(vec![0, 1]),
            },
            power: 1,
            num_controls: 1,
        };
        let inst = Instruction::gate(cp, [QubitId(0), QubitId(1), QubitId(2)]);
        assert!(matches!(
            Statevector::new(3).apply(&inst),
            Err(SimError::InvalidPermutation { expected: 4, got: 2, .. })
        ));
    }

    #[test]
    fn test_sample_deterministic() {
        let mut rng = StdRng::seed_from_u64(7);
        let sv = Statevector::basis(2, 2);
        for _ in 0..50 {
            assert_eq!(sv.sample(&mut rng), 2);
        }
    }

    #[test]
    fn test_from_amplitudes_rejects_bad_length() {
        assert!(matches!(
            Statevector::from_amplitudes(vec![Complex64::new(1.0, 0.0); 3]),
            Err(SimError::InvalidDimension(3))
        ));
    }
}
