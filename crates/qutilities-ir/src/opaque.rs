//! Frozen gate sequences usable as a single gate.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::instruction::{Instruction, InstructionKind};
use crate::sequence::GateSequence;
use crate::unitary::UnitaryDefinition;

/// A sequence exported as one gate.
///
/// The body holds only gate instructions over local qubits
/// `0..num_qubits`; measurements and barriers are dropped on export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpaqueGate {
    label: String,
    num_qubits: u32,
    instructions: Vec<Instruction>,
}

impl OpaqueGate {
    /// Export `sequence` as a gate, keeping its label and width.
    ///
    /// Every kept instruction, including those inside nested gate bodies,
    /// must address only qubits below the frozen width.
    pub fn from_sequence(sequence: &GateSequence) -> IrResult<Self> {
        if sequence.num_qubits() == 0 {
            return Err(IrError::CompositionMismatch {
                label: sequence.label().to_string(),
                reason: "cannot export a sequence with no qubits".into(),
            });
        }
        let instructions: Vec<Instruction> = sequence
            .instructions()
            .iter()
            .filter(|inst| inst.is_gate())
            .cloned()
            .collect();
        check_body(sequence.label(), sequence.num_qubits(), &instructions)?;
        Ok(Self {
            label: sequence.label().to_string(),
            num_qubits: sequence.num_qubits(),
            instructions,
        })
    }

    /// Gate label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Gate width.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Gate body.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Expand the gate back into a sequence of its own width.
    pub fn to_sequence(&self) -> IrResult<GateSequence> {
        let mut sequence = GateSequence::with_size(&self.label, self.num_qubits, 0);
        for inst in &self.instructions {
            sequence.apply(inst.clone())?;
        }
        Ok(sequence)
    }
}

/// Check the bodies a gate carries, recursively.
pub(crate) fn check_nested(gate: &Gate) -> IrResult<()> {
    match gate {
        Gate::Standard(_) => Ok(()),
        Gate::Opaque(inner) => check_body(inner.label(), inner.num_qubits(), inner.instructions()),
        Gate::ControlledPower(cp) => {
            let unitary = &cp.unitary;
            match &unitary.definition {
                UnitaryDefinition::Gates(body) => {
                    check_body(&unitary.name, unitary.num_qubits, body)
                }
                UnitaryDefinition::Permutation(table) => {
                    let size = 1u64.checked_shl(unitary.num_qubits).unwrap_or(0);
                    let fits = table.len() as u64 == size
                        && table.iter().all(|&image| image < size);
                    if fits {
                        Ok(())
                    } else {
                        Err(mismatch(
                            &unitary.name,
                            format!(
                                "permutation of {} entries does not cover {} qubits",
                                table.len(),
                                unitary.num_qubits
                            ),
                        ))
                    }
                }
            }
        }
    }
}

/// Check a gate body against the local width `0..width`.
fn check_body(label: &str, width: u32, body: &[Instruction]) -> IrResult<()> {
    for inst in body {
        let InstructionKind::Gate(gate) = &inst.kind else {
            return Err(mismatch(label, format!("body holds a non-gate '{}'", inst.name())));
        };
        for (i, qubit) in inst.qubits.iter().enumerate() {
            if qubit.0 >= width {
                return Err(mismatch(
                    label,
                    format!("'{}' addresses {qubit} outside {width} qubits", gate.name()),
                ));
            }
            if inst.qubits[..i].contains(qubit) {
                return Err(mismatch(
                    label,
                    format!("'{}' repeats {qubit}", gate.name()),
                ));
            }
        }
        if inst.qubits.len() != gate.num_qubits() as usize {
            return Err(mismatch(
                label,
                format!(
                    "'{}' takes {} qubits, got {}",
                    gate.name(),
                    gate.num_qubits(),
                    inst.qubits.len()
                ),
            ));
        }
        check_nested(gate)?;
    }
    Ok(())
}

fn mismatch(label: &str, reason: String) -> IrError {
    IrError::CompositionMismatch {
        label: label.to_string(),
        reason,
    }
}

impl GateSequence {
    /// Export this sequence as an opaque gate.
    pub fn to_gate(&self) -> IrResult<OpaqueGate> {
        OpaqueGate::from_sequence(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::ControlledPower;
    use crate::qubit::{ClbitId, QubitId};
    use crate::unitary::UnitaryRef;

    #[test]
    fn test_export_strips_measure_and_barrier() {
        let mut seq = GateSequence::with_size("bell", 2, 2);
        seq.h(QubitId(0)).unwrap();
        seq.barrier_all().unwrap();
        seq.cx(QubitId(0), QubitId(1)).unwrap();
        seq.measure(QubitId(0), ClbitId(0)).unwrap();

        let gate = seq.to_gate().unwrap();
        assert_eq!(gate.label(), "bell");
        assert_eq!(gate.num_qubits(), 2);
        assert_eq!(gate.instructions().len(), 2);
        assert!(gate.instructions().iter().all(Instruction::is_gate));
    }

    #[test]
    fn test_export_empty_width_fails() {
        let seq = GateSequence::new("empty");
        assert!(matches!(
            seq.to_gate(),
            Err(IrError::CompositionMismatch { .. })
        ));
    }

    #[test]
    fn test_append_gate_as_unit() {
        let mut inner = GateSequence::with_size("pair", 2, 0);
        inner.h(QubitId(0)).unwrap().swap(QubitId(0), QubitId(1)).unwrap();
        let gate = inner.to_gate().unwrap();

        let mut outer = GateSequence::with_size("outer", 3, 0);
        outer.append_gate(&gate, &[QubitId(2), QubitId(0)]).unwrap();
        assert_eq!(outer.len(), 1);
        assert_eq!(outer.instructions()[0].name(), "pair");

        assert!(matches!(
            outer.append_gate(&gate, &[QubitId(0)]),
            Err(IrError::QubitCountMismatch { expected: 2, got: 1, .. })
        ));
    }

    /// JSON of a 1-qubit sequence applying a 1-qubit opaque gate whose body
    /// has been edited to address qubit 5.
    fn widened_json() -> String {
        let mut inner = GateSequence::with_size("flip", 1, 0);
        inner.x(QubitId(0)).unwrap();
        let gate = inner.to_gate().unwrap();
        let mut outer = GateSequence::with_size("outer", 1, 0);
        outer.append_gate(&gate, &[QubitId(0)]).unwrap();

        let mut value: serde_json::Value = serde_json::from_str(&outer.to_json().unwrap()).unwrap();
        value["instructions"][0]["kind"]["Gate"]["Opaque"]["instructions"][0]["qubits"][0] =
            serde_json::json!(5);
        value.to_string()
    }

    #[test]
    fn test_nested_body_out_of_range_rejected_on_load() {
        assert!(matches!(
            GateSequence::from_json(&widened_json()),
            Err(IrError::CompositionMismatch { label, .. }) if label == "flip"
        ));
    }

    #[test]
    fn test_nested_body_out_of_range_rejected_on_export() {
        let unchecked: GateSequence = serde_json::from_str(&widened_json()).unwrap();
        assert!(matches!(
            unchecked.to_gate(),
            Err(IrError::CompositionMismatch { .. })
        ));
    }

    #[test]
    fn test_export_rejects_top_level_operand_past_width() {
        let mut value: serde_json::Value =
            serde_json::to_value(GateSequence::with_size("s", 1, 0)).unwrap();
        value["instructions"] = serde_json::to_value(vec![Instruction::h(3)]).unwrap();
        let unchecked: GateSequence = serde_json::from_value(value).unwrap();
        assert!(matches!(
            unchecked.to_gate(),
            Err(IrError::CompositionMismatch { label, .. }) if label == "s"
        ));
    }

    #[test]
    fn test_bad_permutation_rejected() {
        let power = ControlledPower {
            unitary: UnitaryRef {
                name: "P".into(),
                num_qubits: 2,
                definition: UnitaryDefinition::Permutation(vec![0, 1, 2]),
            },
            power: 1,
            num_controls: 1,
        };
        assert!(matches!(
            check_nested(&Gate::ControlledPower(power)),
            Err(IrError::CompositionMismatch { .. })
        ));
    }

    #[test]
    fn test_to_sequence_round_trip() {
        let mut inner = GateSequence::with_size("pair", 2, 0);
        inner.h(QubitId(1)).unwrap();
        let back = inner.to_gate().unwrap().to_sequence().unwrap();
        assert_eq!(back.instructions(), inner.instructions());
    }
}
