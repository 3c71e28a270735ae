//! Quantum gate types.

use serde::{Deserialize, Serialize};

use crate::opaque::OpaqueGate;
use crate::unitary::UnitaryRef;

/// Elementary gates with known semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Hadamard gate.
    H,
    /// Pauli-X gate.
    X,
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled phase gate `diag(1, 1, 1, e^{iθ})`.
    CP(f64),
    /// SWAP gate.
    Swap,
    /// Multi-controlled X with the given number of controls.
    ///
    /// Operands are the controls followed by the target.
    MCX(u32),
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::H => "h",
            StandardGate::X => "x",
            StandardGate::CX => "cx",
            StandardGate::CP(_) => "cp",
            StandardGate::Swap => "swap",
            StandardGate::MCX(_) => "mcx",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::H | StandardGate::X => 1,
            StandardGate::CX | StandardGate::CP(_) | StandardGate::Swap => 2,
            StandardGate::MCX(controls) => controls + 1,
        }
    }

    /// Rotation angle, for parameterized gates.
    pub fn angle(&self) -> Option<f64> {
        match self {
            StandardGate::CP(theta) => Some(*theta),
            _ => None,
        }
    }
}

/// Controlled application of a unitary raised to an integer power.
///
/// Operands are the `num_controls` control qubits followed by the
/// unitary's target qubits. `unitary` already describes `U^power`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlledPower {
    /// The powered unitary.
    pub unitary: UnitaryRef,
    /// The exponent that was applied to the base unitary.
    pub power: u64,
    /// Number of control qubits.
    pub num_controls: u32,
}

/// A quantum gate: elementary, an embedded opaque unit, or a controlled power.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// An elementary gate.
    Standard(StandardGate),
    /// A frozen sub-sequence applied as a single unit.
    Opaque(OpaqueGate),
    /// Controlled `U^power`.
    ControlledPower(ControlledPower),
}

impl Gate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            Gate::Standard(g) => g.name(),
            Gate::Opaque(g) => g.label(),
            Gate::ControlledPower(cp) => &cp.unitary.name,
        }
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            Gate::Standard(g) => g.num_qubits(),
            Gate::Opaque(g) => g.num_qubits(),
            Gate::ControlledPower(cp) => cp.num_controls + cp.unitary.num_qubits,
        }
    }

    /// The elementary gate, if this is one.
    pub fn as_standard(&self) -> Option<&StandardGate> {
        match self {
            Gate::Standard(g) => Some(g),
            _ => None,
        }
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::Standard(gate)
    }
}

impl From<OpaqueGate> for Gate {
    fn from(gate: OpaqueGate) -> Self {
        Gate::Opaque(gate)
    }
}

impl From<ControlledPower> for Gate {
    fn from(gate: ControlledPower) -> Self {
        Gate::ControlledPower(gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_standard_gate_properties() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::CP(PI).num_qubits(), 2);
        assert_eq!(StandardGate::MCX(3).num_qubits(), 4);

        assert_eq!(StandardGate::CP(PI / 2.0).angle(), Some(PI / 2.0));
        assert_eq!(StandardGate::Swap.angle(), None);
    }

    #[test]
    fn test_gate_names() {
        assert_eq!(Gate::from(StandardGate::H).name(), "h");
        assert_eq!(Gate::from(StandardGate::MCX(2)).name(), "mcx");
        assert!(Gate::from(StandardGate::X).as_standard().is_some());
    }
}
