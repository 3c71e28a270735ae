//! Quantum Fourier transform synthesis.
//!
//! The forward transform visits control qubits from the highest index down.
//! Each control gets a Hadamard followed by controlled-phase rotations onto
//! every lower qubit `t`, with angle `π / 2^(c-t)`:
//!
//! ```text
//!   H(c), CP(π/2, c, c-1), CP(π/4, c, c-2), ...
//! ```
//!
//! The inverse visits controls from the lowest index up, negates every
//! angle and swaps the operand roles, `CP(-θ, t, c)`, so that the two
//! transforms compose to the identity.
//!
//! An approximation level `k` drops every rotation whose distance `c - t`
//! exceeds `n - 1 - k`.

use std::f64::consts::PI;

use qutilities_ir::{GateSequence, OpaqueGate, QubitId};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{ConfigError, SynthResult};

/// Parameters of a QFT.
///
/// Swaps are on by default, both from [`QftConfig::new`] and when a field
/// is left out of a serialized config, so the transform reads out in
/// the usual most-significant-first order and matches the inverse QFT used
/// by phase estimation. Use [`QftConfig::with_swaps`] with `false` for the
/// bare rotation network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QftConfig {
    /// Width of the transform.
    pub num_qubits: u32,
    /// Build the inverse transform.
    #[serde(default)]
    pub inverse: bool,
    /// Reverse qubit order with swaps.
    #[serde(default = "default_true")]
    pub do_swaps: bool,
    /// Number of smallest-angle rotation distances to drop.
    #[serde(default)]
    pub approximation_level: u32,
    /// Emit a barrier after each control qubit.
    #[serde(default)]
    pub insert_barrier: bool,
    /// Sequence label; defaults to `"QFT (n)"` or `"QFT† (n)"`.
    #[serde(default)]
    pub label: Option<String>,
}

fn default_true() -> bool {
    true
}

impl QftConfig {
    /// Exact forward transform over `num_qubits` qubits, with swaps.
    pub fn new(num_qubits: u32) -> Self {
        Self {
            num_qubits,
            inverse: false,
            do_swaps: true,
            approximation_level: 0,
            insert_barrier: false,
            label: None,
        }
    }

    /// Select the inverse transform.
    #[must_use]
    pub fn with_inverse(mut self, inverse: bool) -> Self {
        self.inverse = inverse;
        self
    }

    /// Enable or disable the final (or, for the inverse, initial) swaps.
    #[must_use]
    pub fn with_swaps(mut self, do_swaps: bool) -> Self {
        self.do_swaps = do_swaps;
        self
    }

    /// Drop rotations more than `num_qubits - 1 - level` qubits apart.
    #[must_use]
    pub fn with_approximation(mut self, level: u32) -> Self {
        self.approximation_level = level;
        self
    }

    /// Emit barriers between control-qubit blocks.
    #[must_use]
    pub fn with_barriers(mut self, insert_barrier: bool) -> Self {
        self.insert_barrier = insert_barrier;
        self
    }

    /// Override the default label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Label used for the generated sequence.
    pub fn label(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None if self.inverse => format!("QFT† ({})", self.num_qubits),
            None => format!("QFT ({})", self.num_qubits),
        }
    }

    /// Check the configuration without building anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_qubits == 0 {
            return Err(ConfigError::NoQubits);
        }
        let max = self.num_qubits - 1;
        if self.approximation_level > max {
            return Err(ConfigError::ApproximationTooLarge {
                level: self.approximation_level,
                num_qubits: self.num_qubits,
                max,
            });
        }
        Ok(())
    }

    /// Largest control/target distance that still gets a rotation.
    fn max_distance(&self) -> u32 {
        self.num_qubits - 1 - self.approximation_level
    }
}

/// Generator for QFT gate sequences.
#[derive(Debug, Clone)]
pub struct QftGenerator {
    config: QftConfig,
}

impl QftGenerator {
    /// Wrap a configuration.
    pub fn new(config: QftConfig) -> Self {
        Self { config }
    }

    /// The configuration this generator builds from.
    pub fn config(&self) -> &QftConfig {
        &self.config
    }

    /// Emit the transform as a gate sequence with no classical bits.
    pub fn build(&self) -> SynthResult<GateSequence> {
        self.config.validate()?;
        let cfg = &self.config;
        let n = cfg.num_qubits;
        let max_distance = cfg.max_distance();

        debug!(
            num_qubits = n,
            inverse = cfg.inverse,
            approximation_level = cfg.approximation_level,
            do_swaps = cfg.do_swaps,
            "synthesising QFT"
        );

        let mut seq = GateSequence::with_size(cfg.label(), n, 0);

        if cfg.inverse && cfg.do_swaps {
            append_swaps(&mut seq, n)?;
            if cfg.insert_barrier {
                seq.barrier_all()?;
            }
        }

        let controls: Vec<u32> = if cfg.inverse {
            (0..n).collect()
        } else {
            (0..n).rev().collect()
        };

        for c in controls {
            seq.h(QubitId(c))?;

            let targets: Vec<u32> = if cfg.inverse {
                (c + 1..n).collect()
            } else {
                (0..c).rev().collect()
            };

            for t in targets {
                let distance = c.abs_diff(t);
                if distance > max_distance {
                    continue;
                }
                let angle = rotation_angle(distance);
                if cfg.inverse {
                    seq.cp(-angle, QubitId(t), QubitId(c))?;
                } else {
                    seq.cp(angle, QubitId(c), QubitId(t))?;
                }
            }

            if cfg.insert_barrier {
                seq.barrier_all()?;
            }
        }

        if !cfg.inverse && cfg.do_swaps {
            append_swaps(&mut seq, n)?;
        }

        trace!(instructions = seq.len(), depth = seq.depth(), "QFT complete");
        Ok(seq)
    }

    /// Emit the transform and freeze it into an opaque gate.
    ///
    /// Barriers are never part of the exported gate.
    pub fn build_gate(&self) -> SynthResult<OpaqueGate> {
        Ok(self.build()?.to_gate()?)
    }
}

/// `π / 2^distance`.
fn rotation_angle(distance: u32) -> f64 {
    let exponent = i32::try_from(distance).unwrap_or(i32::MAX);
    PI / 2f64.powi(exponent)
}

fn append_swaps(seq: &mut GateSequence, n: u32) -> SynthResult<()> {
    for i in 0..n / 2 {
        seq.swap(QubitId(i), QubitId(n - 1 - i))?;
    }
    Ok(())
}
