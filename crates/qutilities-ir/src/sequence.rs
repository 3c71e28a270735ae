//! Ordered, fixed-width gate sequences.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{ControlledPower, Gate, StandardGate};
use crate::instruction::{Instruction, InstructionKind};
use crate::opaque::{check_nested, OpaqueGate};
use crate::qubit::{Clbit, ClbitId, Qubit, QubitId};

/// An ordered list of instructions over a fixed number of qubits and
/// classical bits.
///
/// Every operand of every instruction is checked against the declared
/// widths when it is appended, so a `GateSequence` never holds an
/// out-of-range index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateSequence {
    /// Label of the sequence.
    label: String,
    /// Qubits in the sequence.
    qubits: Vec<Qubit>,
    /// Classical bits in the sequence.
    clbits: Vec<Clbit>,
    /// Instructions in application order.
    instructions: Vec<Instruction>,
}

impl GateSequence {
    /// Create a new empty sequence.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            qubits: vec![],
            clbits: vec![],
            instructions: vec![],
        }
    }

    /// Create a sequence with a given number of qubits and classical bits.
    pub fn with_size(label: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut sequence = Self::new(label);
        for _ in 0..num_qubits {
            sequence.add_qubit();
        }
        for _ in 0..num_clbits {
            sequence.add_clbit();
        }
        sequence
    }

    /// Add a single qubit to the sequence.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId(self.num_qubits());
        self.qubits.push(Qubit::new(id));
        id
    }

    /// Add a quantum register with multiple qubits.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> Vec<QubitId> {
        let name = name.into();
        let mut ids = vec![];
        for i in 0..size {
            let id = QubitId(self.num_qubits());
            self.qubits.push(Qubit::with_register(id, &name, i));
            ids.push(id);
        }
        ids
    }

    /// Add a single classical bit to the sequence.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = ClbitId(self.num_clbits());
        self.clbits.push(Clbit::new(id));
        id
    }

    /// Add a classical register with multiple bits.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> Vec<ClbitId> {
        let name = name.into();
        let mut ids = vec![];
        for i in 0..size {
            let id = ClbitId(self.num_clbits());
            self.clbits.push(Clbit::with_register(id, &name, i));
            ids.push(id);
        }
        ids
    }

    // =========================================================================
    // Gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::X, qubit))
    }

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::CX, control, target))
    }

    /// Apply controlled-phase gate.
    pub fn cp(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(
            StandardGate::CP(theta),
            control,
            target,
        ))
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::Swap, q1, q2))
    }

    /// Apply a multi-controlled X gate.
    pub fn mcx(&mut self, controls: &[QubitId], target: QubitId) -> IrResult<&mut Self> {
        let num_controls = u32::try_from(controls.len()).unwrap_or(u32::MAX);
        let operands = controls.iter().copied().chain([target]);
        self.apply(Instruction::gate(StandardGate::MCX(num_controls), operands))
    }

    /// Apply a controlled power of a unitary.
    pub fn controlled_power(
        &mut self,
        gate: ControlledPower,
        controls: &[QubitId],
        targets: &[QubitId],
    ) -> IrResult<&mut Self> {
        let operands = controls.iter().chain(targets).copied();
        self.apply(Instruction::gate(gate, operands))
    }

    /// Apply an arbitrary gate.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(gate, qubits))
    }

    /// Apply an opaque gate as a single unit on `qubits`.
    pub fn append_gate(&mut self, gate: &OpaqueGate, qubits: &[QubitId]) -> IrResult<&mut Self> {
        self.gate(gate.clone(), qubits.iter().copied())
    }

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.apply(Instruction::measure(qubit, clbit))
    }

    /// Apply a barrier to specified qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.apply(Instruction::barrier(qubits))
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = self.qubits.iter().map(|q| q.id).collect();
        self.apply(Instruction::barrier(qubits))
    }

    /// Validate and append an instruction.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.validate(&instruction)?;
        self.instructions.push(instruction);
        Ok(self)
    }

    // =========================================================================
    // Composition
    // =========================================================================

    /// Append `other` with its qubit `i` mapped onto `qubits[i]`.
    ///
    /// Classical bits keep their indices. Either every instruction of
    /// `other` is appended or none is.
    pub fn compose(&mut self, other: &GateSequence, qubits: &[QubitId]) -> IrResult<&mut Self> {
        if qubits.len() != other.qubits.len() {
            return Err(IrError::CompositionMismatch {
                label: other.label.clone(),
                reason: format!(
                    "{} qubits mapped onto {} target qubits",
                    other.qubits.len(),
                    qubits.len()
                ),
            });
        }
        if other.num_clbits() > self.num_clbits() {
            return Err(IrError::CompositionMismatch {
                label: other.label.clone(),
                reason: format!(
                    "needs {} classical bits, target has {}",
                    other.num_clbits(),
                    self.num_clbits()
                ),
            });
        }

        let mapped: Vec<Instruction> = other
            .instructions
            .iter()
            .map(|inst| inst.remapped(|q| qubits[q.0 as usize], |c| c))
            .collect();
        for inst in &mapped {
            self.validate(inst)?;
        }
        self.instructions.extend(mapped);
        Ok(self)
    }

    /// Append `other` onto the contiguous qubit block starting at `offset`.
    pub fn append_at(&mut self, other: &GateSequence, offset: u32) -> IrResult<&mut Self> {
        let end = offset + other.num_qubits();
        if end > self.num_qubits() {
            return Err(IrError::CompositionMismatch {
                label: other.label.clone(),
                reason: format!(
                    "qubits {offset}..{end} exceed the {}-qubit target",
                    self.num_qubits()
                ),
            });
        }
        let qubits: Vec<QubitId> = (offset..end).map(QubitId).collect();
        self.compose(other, &qubits)
    }

    /// Copy of this sequence with every instruction matching `drop` removed.
    #[must_use]
    pub fn without(&self, drop: impl Fn(&Instruction) -> bool) -> Self {
        Self {
            label: self.label.clone(),
            qubits: self.qubits.clone(),
            clbits: self.clbits.clone(),
            instructions: self
                .instructions
                .iter()
                .filter(|inst| !drop(inst))
                .cloned()
                .collect(),
        }
    }

    // =========================================================================
    // Validation
    // =========================================================================

    fn validate(&self, instruction: &Instruction) -> IrResult<()> {
        let gate_name = || Some(instruction.name().to_string());
        let width = self.num_qubits();

        for (i, &qubit) in instruction.qubits.iter().enumerate() {
            if qubit.0 >= width {
                return Err(IrError::QubitNotFound {
                    qubit,
                    width,
                    gate_name: gate_name(),
                });
            }
            if instruction.qubits[..i].contains(&qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: gate_name(),
                });
            }
        }

        let clbit_width = self.num_clbits();
        for &clbit in &instruction.clbits {
            if clbit.0 >= clbit_width {
                return Err(IrError::ClbitNotFound {
                    clbit,
                    width: clbit_width,
                    gate_name: gate_name(),
                });
            }
        }

        let got = u32::try_from(instruction.qubits.len()).unwrap_or(u32::MAX);
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                if gate.num_qubits() != got {
                    return Err(IrError::QubitCountMismatch {
                        gate_name: gate.name().to_string(),
                        expected: gate.num_qubits(),
                        got,
                    });
                }
                check_nested(gate)?;
            }
            InstructionKind::Measure => {
                let expected = u32::try_from(instruction.clbits.len()).unwrap_or(u32::MAX);
                if expected != got {
                    return Err(IrError::QubitCountMismatch {
                        gate_name: "measure".into(),
                        expected,
                        got,
                    });
                }
            }
            InstructionKind::Barrier => {}
        }
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the sequence label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Replace the sequence label.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        u32::try_from(self.qubits.len()).unwrap_or(u32::MAX)
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> u32 {
        u32::try_from(self.clbits.len()).unwrap_or(u32::MAX)
    }

    /// Get the qubits in the sequence.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Get the classical bits in the sequence.
    pub fn clbits(&self) -> &[Clbit] {
        &self.clbits
    }

    /// Instructions in application order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Consume the sequence and return its instructions.
    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// True if the sequence holds no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Number of instructions per instruction name.
    pub fn gate_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for inst in &self.instructions {
            *counts.entry(inst.name().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Circuit depth: length of the longest chain of instructions sharing a
    /// wire. Barriers align their wires but do not add a layer.
    pub fn depth(&self) -> usize {
        let mut qubit_level = vec![0usize; self.qubits.len()];
        let mut clbit_level = vec![0usize; self.clbits.len()];
        let mut depth = 0;

        for inst in &self.instructions {
            let start = inst
                .qubits
                .iter()
                .map(|q| qubit_level[q.0 as usize])
                .chain(inst.clbits.iter().map(|c| clbit_level[c.0 as usize]))
                .max()
                .unwrap_or(0);
            let level = if inst.is_barrier() { start } else { start + 1 };
            for q in &inst.qubits {
                qubit_level[q.0 as usize] = level;
            }
            for c in &inst.clbits {
                clbit_level[c.0 as usize] = level;
            }
            depth = depth.max(level);
        }
        depth
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> IrResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON, re-checking every operand against the widths,
    /// including operands inside nested gate bodies.
    pub fn from_json(json: &str) -> IrResult<Self> {
        let raw: GateSequence = serde_json::from_str(json)?;
        let mut sequence = Self {
            label: raw.label,
            qubits: raw.qubits,
            clbits: raw.clbits,
            instructions: Vec::with_capacity(raw.instructions.len()),
        };
        for inst in raw.instructions {
            sequence.apply(inst)?;
        }
        Ok(sequence)
    }
}

impl fmt::Display for GateSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({} qubits, {} clbits)",
            self.label,
            self.qubits.len(),
            self.clbits.len()
        )?;
        for inst in &self.instructions {
            let qubits = inst
                .qubits
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            match &inst.kind {
                InstructionKind::Gate(Gate::Standard(StandardGate::CP(theta))) => {
                    writeln!(f, "  cp({theta:.6}) {qubits}")?;
                }
                InstructionKind::Gate(Gate::ControlledPower(cp)) => {
                    writeln!(f, "  c-{} {qubits}", cp.unitary.name)?;
                }
                InstructionKind::Measure => {
                    let clbits = inst
                        .clbits
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ");
                    writeln!(f, "  measure {qubits} -> {clbits}")?;
                }
                _ => writeln!(f, "  {} {qubits}", inst.name())?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_new_sequence() {
        let sequence = GateSequence::new("test");
        assert_eq!(sequence.label(), "test");
        assert_eq!(sequence.num_qubits(), 0);
        assert_eq!(sequence.num_clbits(), 0);
        assert!(sequence.is_empty());
    }

    #[test]
    fn test_sequence_with_size() {
        let sequence = GateSequence::with_size("test", 3, 2);
        assert_eq!(sequence.num_qubits(), 3);
        assert_eq!(sequence.num_clbits(), 2);
    }

    #[test]
    fn test_add_registers() {
        let mut sequence = GateSequence::new("test");
        let control = sequence.add_qreg("control", 3);
        let phase = sequence.add_qreg("phase", 1);
        let result = sequence.add_creg("result", 3);

        assert_eq!(control, vec![QubitId(0), QubitId(1), QubitId(2)]);
        assert_eq!(phase, vec![QubitId(3)]);
        assert_eq!(result.len(), 3);
        assert_eq!(sequence.qubits()[3].to_string(), "phase[0]");
    }

    #[test]
    fn test_fluent_api() {
        let mut sequence = GateSequence::with_size("test", 2, 2);
        sequence
            .h(QubitId(1))
            .unwrap()
            .cp(PI / 2.0, QubitId(1), QubitId(0))
            .unwrap()
            .h(QubitId(0))
            .unwrap()
            .swap(QubitId(0), QubitId(1))
            .unwrap();

        assert_eq!(sequence.len(), 4);
        assert_eq!(sequence.depth(), 4);
    }

    #[test]
    fn test_out_of_range_qubit_rejected() {
        let mut sequence = GateSequence::with_size("test", 2, 0);
        let err = sequence.h(QubitId(2)).unwrap_err();
        assert!(matches!(err, IrError::QubitNotFound { width: 2, .. }));
        assert!(sequence.is_empty());
    }

    #[test]
    fn test_out_of_range_clbit_rejected() {
        let mut sequence = GateSequence::with_size("test", 2, 1);
        assert!(matches!(
            sequence.measure(QubitId(1), ClbitId(1)),
            Err(IrError::ClbitNotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_qubit_rejected() {
        let mut sequence = GateSequence::with_size("test", 2, 0);
        assert!(matches!(
            sequence.cp(PI, QubitId(1), QubitId(1)),
            Err(IrError::DuplicateQubit { .. })
        ));
    }

    #[test]
    fn test_compose_maps_qubits() {
        let mut inner = GateSequence::with_size("inner", 2, 0);
        inner.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();

        let mut outer = GateSequence::with_size("outer", 4, 0);
        outer.compose(&inner, &[QubitId(3), QubitId(1)]).unwrap();

        assert_eq!(outer.instructions()[0].qubits, vec![QubitId(3)]);
        assert_eq!(outer.instructions()[1].qubits, vec![QubitId(3), QubitId(1)]);
    }

    #[test]
    fn test_append_at_rejects_overflow() {
        let inner = GateSequence::with_size("inner", 3, 0);
        let mut outer = GateSequence::with_size("outer", 4, 0);
        assert!(outer.append_at(&inner, 1).is_ok());
        assert!(matches!(
            outer.append_at(&inner, 2),
            Err(IrError::CompositionMismatch { .. })
        ));
    }

    #[test]
    fn test_compose_width_mismatch() {
        let inner = GateSequence::with_size("inner", 2, 0);
        let mut outer = GateSequence::with_size("outer", 4, 0);
        assert!(matches!(
            outer.compose(&inner, &[QubitId(0)]),
            Err(IrError::CompositionMismatch { .. })
        ));
    }

    #[test]
    fn test_depth_with_barrier() {
        let mut sequence = GateSequence::with_size("test", 2, 0);
        sequence.h(QubitId(0)).unwrap();
        sequence.barrier_all().unwrap();
        sequence.h(QubitId(1)).unwrap();
        // The barrier forces q1's H after q0's H.
        assert_eq!(sequence.depth(), 2);
    }

    #[test]
    fn test_gate_counts() {
        let mut sequence = GateSequence::with_size("test", 3, 0);
        sequence.h(QubitId(0)).unwrap().h(QubitId(1)).unwrap();
        sequence.mcx(&[QubitId(0), QubitId(1)], QubitId(2)).unwrap();
        let counts = sequence.gate_counts();
        assert_eq!(counts["h"], 2);
        assert_eq!(counts["mcx"], 1);
    }

    #[test]
    fn test_json_rejects_out_of_range() {
        let mut sequence = GateSequence::with_size("test", 2, 0);
        sequence.h(QubitId(1)).unwrap();
        let json = sequence.to_json().unwrap();
        assert_eq!(GateSequence::from_json(&json).unwrap(), sequence);

        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["instructions"][0]["qubits"][0] = serde_json::json!(7);
        assert!(matches!(
            GateSequence::from_json(&value.to_string()),
            Err(IrError::QubitNotFound { .. })
        ));
    }
}
