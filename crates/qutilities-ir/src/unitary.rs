//! Externally supplied unitaries and their powers.

use std::fmt::Debug;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::instruction::Instruction;
use crate::opaque::OpaqueGate;

/// How a powered unitary acts on its target qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UnitaryDefinition {
    /// A gate body over local qubits `0..num_qubits`.
    Gates(Vec<Instruction>),
    /// A basis-state permutation: basis index `i` maps to `table[i]`.
    Permutation(Vec<u64>),
}

/// A concrete `U^e`, ready to be placed under control in a sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitaryRef {
    /// Display name, e.g. `"U^4"`.
    pub name: String,
    /// Width of the unitary.
    pub num_qubits: u32,
    /// The action of the unitary.
    pub definition: UnitaryDefinition,
}

/// Capability interface for unitaries supplied to phase estimation.
///
/// Implementors must be able to produce integer powers of themselves.
/// A handle that cannot be controlled reports so through
/// [`UnitaryHandle::supports_control`].
pub trait UnitaryHandle: Debug + Send + Sync {
    /// Human-readable name.
    fn name(&self) -> &str;

    /// Width of the unitary.
    fn num_qubits(&self) -> u32;

    /// `U^exponent`, or `None` if powers are unavailable.
    fn power(&self, exponent: u64) -> Option<UnitaryRef>;

    /// Whether a controlled version of this unitary can be built.
    fn supports_control(&self) -> bool {
        true
    }
}

/// Shared handle to a unitary.
pub type SharedUnitary = Arc<dyn UnitaryHandle>;

/// Largest body a [`GateUnitary`] power may expand to.
pub const MAX_POWER_INSTRUCTIONS: usize = 1 << 16;

/// A unitary defined by an opaque gate. Powers repeat the gate body.
///
/// A power whose expanded body would exceed [`MAX_POWER_INSTRUCTIONS`]
/// instructions is reported as unavailable.
#[derive(Debug, Clone, PartialEq)]
pub struct GateUnitary {
    gate: OpaqueGate,
}

impl GateUnitary {
    /// Wrap an opaque gate.
    pub fn new(gate: OpaqueGate) -> Self {
        Self { gate }
    }

    /// The wrapped gate.
    pub fn gate(&self) -> &OpaqueGate {
        &self.gate
    }
}

impl UnitaryHandle for GateUnitary {
    fn name(&self) -> &str {
        self.gate.label()
    }

    fn num_qubits(&self) -> u32 {
        self.gate.num_qubits()
    }

    fn power(&self, exponent: u64) -> Option<UnitaryRef> {
        let body = self.gate.instructions();
        let total = usize::try_from(exponent)
            .ok()
            .and_then(|repeats| body.len().checked_mul(repeats))
            .filter(|&total| total <= MAX_POWER_INSTRUCTIONS)?;
        let instructions = body.iter().cycle().take(total).cloned().collect();
        Some(UnitaryRef {
            name: format!("{}^{exponent}", self.gate.label()),
            num_qubits: self.gate.num_qubits(),
            definition: UnitaryDefinition::Gates(instructions),
        })
    }
}
