//! Deutsch's problem on a single input bit.

use qutilities_ir::GateSequence;
use serde::{Deserialize, Serialize};

use crate::error::{AlgoError, AlgoResult};
use crate::oracle::{FunctionClass, compile_oracle_circuit};

/// The four Boolean functions of one bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeutschFunction {
    /// `f(x) = 0`.
    ConstantZero,
    /// `f(x) = x`.
    Identity,
    /// `f(x) = !x`.
    Negation,
    /// `f(x) = 1`.
    ConstantOne,
}

impl DeutschFunction {
    /// All four functions in case order.
    pub const ALL: [DeutschFunction; 4] = [
        DeutschFunction::ConstantZero,
        DeutschFunction::Identity,
        DeutschFunction::Negation,
        DeutschFunction::ConstantOne,
    ];

    /// Look up a function by its case number, 1 through 4.
    pub fn from_case(case: u8) -> AlgoResult<Self> {
        match case {
            1 => Ok(DeutschFunction::ConstantZero),
            2 => Ok(DeutschFunction::Identity),
            3 => Ok(DeutschFunction::Negation),
            4 => Ok(DeutschFunction::ConstantOne),
            other => Err(AlgoError::InvalidCase(other)),
        }
    }

    /// Case number of this function.
    pub fn case(self) -> u8 {
        match self {
            DeutschFunction::ConstantZero => 1,
            DeutschFunction::Identity => 2,
            DeutschFunction::Negation => 3,
            DeutschFunction::ConstantOne => 4,
        }
    }

    /// Whether the function is constant or balanced.
    pub fn class(self) -> FunctionClass {
        match self {
            DeutschFunction::ConstantZero | DeutschFunction::ConstantOne => {
                FunctionClass::Constant
            }
            DeutschFunction::Identity | DeutschFunction::Negation => FunctionClass::Balanced,
        }
    }

    /// Two-qubit oracle `|x, y⟩ → |x, y ⊕ f(x)⟩`, input on qubit 0.
    pub fn oracle(self) -> AlgoResult<GateSequence> {
        let mut seq = GateSequence::new(format!("Deutsch f{}", self.case()));
        let input = seq.add_qreg("control", 1)[0];
        let ancilla = seq.add_qreg("ancilla", 1)[0];

        if matches!(
            self,
            DeutschFunction::Identity | DeutschFunction::Negation
        ) {
            seq.cx(input, ancilla)?;
        }
        if matches!(
            self,
            DeutschFunction::Negation | DeutschFunction::ConstantOne
        ) {
            seq.x(ancilla)?;
        }
        Ok(seq)
    }

    /// Full measured circuit for this function.
    pub fn circuit(self) -> AlgoResult<GateSequence> {
        compile_oracle_circuit(&self.oracle()?)
    }

    /// Evaluate the function classically.
    pub fn evaluate(self, x: bool) -> bool {
        match self {
            DeutschFunction::ConstantZero => false,
            DeutschFunction::Identity => x,
            DeutschFunction::Negation => !x,
            DeutschFunction::ConstantOne => true,
        }
    }
}

impl std::fmt::Display for DeutschFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeutschFunction::ConstantZero => write!(f, "f(x) = 0"),
            DeutschFunction::Identity => write!(f, "f(x) = x"),
            DeutschFunction::Negation => write!(f, "f(x) = not x"),
            DeutschFunction::ConstantOne => write!(f, "f(x) = 1"),
        }
    }
}
