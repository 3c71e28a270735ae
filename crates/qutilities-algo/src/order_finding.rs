//! Order finding as phase estimation of modular multiplication.
//!
//! For a modulus `N` of width `L = ⌈log₂ N⌉` and a base `a` coprime to `N`,
//! the unitary `|x⟩ → |a·x mod N⟩` (identity for `x ≥ N`) has eigenphases
//! `s/r` where `r` is the order of `a`. Estimating them with `2L` control
//! qubits from the eigenstate mixture `|1⟩` yields outcomes near multiples
//! of `2^(2L)/r`. Recovering `r` from those outcomes is left to the caller.

use std::sync::Arc;

use qutilities_ir::{GateSequence, UnitaryDefinition, UnitaryHandle, UnitaryRef};
use qutilities_synth::{QpeComposer, QpeConfig};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::error::{AlgoError, AlgoResult};

/// Largest supported modulus.
pub const MAX_MODULUS: u64 = 1 << 16;

/// Greatest common divisor.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// `base^exp mod modulus` by square and multiply.
pub fn mod_pow(base: u64, mut exp: u64, modulus: u64) -> u64 {
    let m = u128::from(modulus);
    let mut result = 1u128 % m;
    let mut b = u128::from(base) % m;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * b % m;
        }
        b = b * b % m;
        exp >>= 1;
    }
    // result < modulus
    result as u64
}

fn check_modulus(modulus: u64) -> AlgoResult<()> {
    if !(3..=MAX_MODULUS).contains(&modulus) {
        return Err(AlgoError::InvalidModulus {
            got: modulus,
            max: MAX_MODULUS,
        });
    }
    Ok(())
}

/// Number of qubits needed to hold residues modulo `modulus`.
pub fn register_width(modulus: u64) -> u32 {
    64 - (modulus - 1).leading_zeros()
}

/// Pick a base uniformly from `[2, N-1]` among those coprime to `N`.
pub fn select_base<R: Rng + ?Sized>(modulus: u64, rng: &mut R) -> AlgoResult<u64> {
    check_modulus(modulus)?;
    let candidates: Vec<u64> = (2..modulus).filter(|&a| gcd(a, modulus) == 1).collect();
    candidates
        .choose(rng)
        .copied()
        .ok_or_else(|| AlgoError::InvalidBase {
            base: 0,
            modulus,
            reason: "no base in [2, N-1] is coprime to N".into(),
        })
}

/// The unitary `|x⟩ → |a·x mod N⟩` on `⌈log₂ N⌉` qubits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModularMultiplication {
    base: u64,
    modulus: u64,
    num_qubits: u32,
    name: String,
}

impl ModularMultiplication {
    /// Multiplication by `base` modulo `modulus`.
    pub fn new(base: u64, modulus: u64) -> AlgoResult<Self> {
        check_modulus(modulus)?;
        let invalid = |reason: &str| AlgoError::InvalidBase {
            base,
            modulus,
            reason: reason.into(),
        };
        if base < 2 || base >= modulus {
            return Err(invalid("base must lie in [2, N-1]"));
        }
        if gcd(base, modulus) != 1 {
            return Err(invalid("base shares a factor with N"));
        }
        Ok(Self {
            base,
            modulus,
            num_qubits: register_width(modulus),
            name: format!("mul{base}_mod{modulus}"),
        })
    }

    /// The multiplier `a`.
    pub fn base(&self) -> u64 {
        self.base
    }

    /// The modulus `N`.
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Basis permutation of `U^exponent`.
    pub fn permutation(&self, exponent: u64) -> Vec<u64> {
        let factor = u128::from(mod_pow(self.base, exponent, self.modulus));
        let n = u128::from(self.modulus);
        (0..1u64 << self.num_qubits)
            .map(|x| {
                if x < self.modulus {
                    // Below the modulus, so fits back into u64.
                    (factor * u128::from(x) % n) as u64
                } else {
                    x
                }
            })
            .collect()
    }
}

impl UnitaryHandle for ModularMultiplication {
    fn name(&self) -> &str {
        &self.name
    }

    fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    fn power(&self, exponent: u64) -> Option<UnitaryRef> {
        Some(UnitaryRef {
            name: format!("{}^{exponent}", self.name),
            num_qubits: self.num_qubits,
            definition: UnitaryDefinition::Permutation(self.permutation(exponent)),
        })
    }
}

/// A built order-finding circuit with the base it uses.
#[derive(Debug, Clone)]
pub struct OrderFindingCircuit {
    /// The base `a`.
    pub base: u64,
    /// The modulus `N`.
    pub modulus: u64,
    /// Phase estimation over `2L` control and `L` work qubits.
    pub sequence: GateSequence,
}

/// Builder for order-finding circuits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderFinding {
    modulus: u64,
    base: Option<u64>,
    barriers: bool,
}

impl OrderFinding {
    /// Order finding modulo `modulus` with a random base.
    pub fn new(modulus: u64) -> Self {
        Self {
            modulus,
            base: None,
            barriers: false,
        }
    }

    /// Fix the base instead of drawing one.
    #[must_use]
    pub fn with_base(mut self, base: u64) -> Self {
        self.base = Some(base);
        self
    }

    /// Insert barriers between phase-estimation stages.
    #[must_use]
    pub fn with_barriers(mut self, barriers: bool) -> Self {
        self.barriers = barriers;
        self
    }

    /// Build with a base drawn from the thread-local generator when unset.
    pub fn build(&self) -> AlgoResult<OrderFindingCircuit> {
        self.build_with_rng(&mut rand::thread_rng())
    }

    /// Build, drawing an unset base from `rng`.
    pub fn build_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> AlgoResult<OrderFindingCircuit> {
        let base = match self.base {
            Some(base) => base,
            None => select_base(self.modulus, rng)?,
        };
        let unitary = ModularMultiplication::new(base, self.modulus)?;
        let width = unitary.num_qubits();
        info!(modulus = self.modulus, base, width, "building order-finding circuit");

        let config = QpeConfig::new(2 * width, width)
            .with_unitary(Arc::new(unitary))
            .with_init_phase(true)
            .with_barriers(self.barriers)
            .with_label(format!("Order finding ({base} mod {})", self.modulus));
        let sequence = QpeComposer::new(config).build()?;

        debug!(instructions = sequence.len(), "order-finding circuit built");
        Ok(OrderFindingCircuit {
            base,
            modulus: self.modulus,
            sequence,
        })
    }
}
