//! Instructions: a gate, measurement or barrier bound to its operands.

use serde::{Deserialize, Serialize};

use crate::gate::{Gate, StandardGate};
use crate::qubit::{ClbitId, QubitId};

/// What an instruction does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// Apply a gate.
    Gate(Gate),
    /// Measurement of qubits into classical bits, pairwise.
    Measure,
    /// Ordering fence with no effect on the state.
    Barrier,
}

/// An instruction with its operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// Operation.
    pub kind: InstructionKind,
    /// Qubit operands; controls precede targets.
    pub qubits: Vec<QubitId>,
    /// Classical operands, paired with `qubits` for measurements.
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    /// Gate on `qubits`.
    pub fn gate(gate: impl Into<Gate>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Gate(gate.into()),
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// One-qubit gate.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    /// Two-qubit gate.
    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> Self {
        Self::gate(gate, [q1, q2])
    }

    /// Hadamard on `qubit`.
    pub fn h(qubit: impl Into<QubitId>) -> Self {
        Self::single_qubit_gate(StandardGate::H, qubit.into())
    }

    /// Pauli-X on `qubit`.
    pub fn x(qubit: impl Into<QubitId>) -> Self {
        Self::single_qubit_gate(StandardGate::X, qubit.into())
    }

    /// Controlled phase `theta` with explicit control and target operands.
    pub fn cp(theta: f64, control: impl Into<QubitId>, target: impl Into<QubitId>) -> Self {
        Self::two_qubit_gate(StandardGate::CP(theta), control.into(), target.into())
    }

    /// SWAP of `a` and `b`.
    pub fn swap(a: impl Into<QubitId>, b: impl Into<QubitId>) -> Self {
        Self::two_qubit_gate(StandardGate::Swap, a.into(), b.into())
    }

    /// Measure `qubit` into `clbit`.
    pub fn measure(qubit: impl Into<QubitId>, clbit: impl Into<ClbitId>) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: vec![qubit.into()],
            clbits: vec![clbit.into()],
        }
    }

    /// Barrier across `qubits`.
    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Barrier,
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Whether this applies a gate.
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, InstructionKind::Gate(_))
    }

    /// Whether this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    /// Whether this is a barrier.
    pub fn is_barrier(&self) -> bool {
        matches!(self.kind, InstructionKind::Barrier)
    }

    /// Get the gate if this is a gate instruction.
    pub fn as_gate(&self) -> Option<&Gate> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// Get the elementary gate if this is one.
    pub fn as_standard(&self) -> Option<&StandardGate> {
        self.as_gate().and_then(Gate::as_standard)
    }

    /// Get the name of the instruction.
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Measure => "measure",
            InstructionKind::Barrier => "barrier",
        }
    }

    /// Copy of this instruction with every operand passed through `map`.
    ///
    /// Qubits inside an opaque gate's body are local to the gate and are
    /// left untouched.
    #[must_use]
    pub fn remapped(
        &self,
        qubit_map: impl Fn(QubitId) -> QubitId,
        clbit_map: impl Fn(ClbitId) -> ClbitId,
    ) -> Self {
        Self {
            kind: self.kind.clone(),
            qubits: self.qubits.iter().copied().map(qubit_map).collect(),
            clbits: self.clbits.iter().copied().map(clbit_map).collect(),
        }
    }
}
