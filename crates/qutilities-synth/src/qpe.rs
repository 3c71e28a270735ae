//! Quantum phase estimation.
//!
//! The control register occupies qubits `0..c` and the phase register
//! `c..c+p`. The composer emits, in order:
//!
//! 1. an optional X on the first phase qubit,
//! 2. a Hadamard on every control qubit,
//! 3. for each control qubit `k`, the rotation raised to `2^k` applied to
//!    the phase register under control of `k`,
//! 4. the inverse QFT over the control register,
//! 5. a measurement of control qubit `k` into classical bit `k`.
//!
//! Reading classical bits as an integer `m` gives `m / 2^c ≈ phase`.

use std::f64::consts::TAU;

use qutilities_ir::{ControlledPower, GateSequence, OpaqueGate, SharedUnitary, UnitaryHandle};
use tracing::debug;

use crate::error::{ConfigError, SynthError, SynthResult};
use crate::qft::{QftConfig, QftGenerator};

/// Largest supported control register.
pub const MAX_CONTROL_QUBITS: u32 = 63;

/// What gets raised to powers of two under control.
#[derive(Debug, Clone)]
pub enum RotationSource {
    /// A phase `e^{2πiθ}` applied with a controlled-phase gate.
    Theta(f64),
    /// An arbitrary unitary applied as a controlled power.
    Unitary(SharedUnitary),
}

/// Parameters of a phase estimation.
#[derive(Debug, Clone)]
pub struct QpeConfig {
    control_qubits: u32,
    phase_qubits: u32,
    theta: Option<f64>,
    unitary: Option<SharedUnitary>,
    init_phase: bool,
    insert_barrier: bool,
    label: Option<String>,
}

impl QpeConfig {
    /// Start a configuration with the given register widths.
    ///
    /// Exactly one of [`with_theta`](Self::with_theta) or
    /// [`with_unitary`](Self::with_unitary) must be called before building.
    pub fn new(control_qubits: u32, phase_qubits: u32) -> Self {
        Self {
            control_qubits,
            phase_qubits,
            theta: None,
            unitary: None,
            init_phase: false,
            insert_barrier: false,
            label: None,
        }
    }

    /// Estimate the phase `θ` of a single-qubit phase rotation.
    #[must_use]
    pub fn with_theta(mut self, theta: f64) -> Self {
        self.theta = Some(theta);
        self
    }

    /// Estimate an eigenphase of `unitary`.
    #[must_use]
    pub fn with_unitary(mut self, unitary: SharedUnitary) -> Self {
        self.unitary = Some(unitary);
        self
    }

    /// Flip the first phase qubit to `|1⟩` before estimation.
    #[must_use]
    pub fn with_init_phase(mut self, init_phase: bool) -> Self {
        self.init_phase = init_phase;
        self
    }

    /// Emit barriers between stages.
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

    /// Control register width.
    pub fn control_qubits(&self) -> u32 {
        self.control_qubits
    }

    /// Phase register width.
    pub fn phase_qubits(&self) -> u32 {
        self.phase_qubits
    }

    /// Label used for the generated sequence.
    pub fn label(&self) -> String {
        self.label.clone().unwrap_or_else(|| {
            format!("QPE ({} ⊗ {})", self.control_qubits, self.phase_qubits)
        })
    }

    /// Check the configuration and resolve the rotation source.
    pub fn validate(&self) -> SynthResult<RotationSource> {
        if self.control_qubits == 0 {
            return Err(ConfigError::NoControlQubits.into());
        }
        if self.phase_qubits == 0 {
            return Err(ConfigError::NoPhaseQubits.into());
        }
        if self.control_qubits > MAX_CONTROL_QUBITS {
            return Err(ConfigError::TooManyControlQubits {
                control_qubits: self.control_qubits,
                max: MAX_CONTROL_QUBITS,
            }
            .into());
        }

        match (self.theta, &self.unitary) {
            (Some(_), Some(_)) => Err(ConfigError::AmbiguousRotation.into()),
            (None, None) => Err(ConfigError::MissingRotation.into()),
            (Some(theta), None) => {
                if self.phase_qubits != 1 {
                    return Err(ConfigError::ThetaNeedsSinglePhaseQubit {
                        phase_qubits: self.phase_qubits,
                    }
                    .into());
                }
                if !theta.is_finite() {
                    return Err(ConfigError::NonFiniteTheta(theta).into());
                }
                Ok(RotationSource::Theta(theta))
            }
            (None, Some(unitary)) => {
                if unitary.num_qubits() != self.phase_qubits {
                    return Err(ConfigError::UnitaryWidthMismatch {
                        unitary: unitary.name().to_string(),
                        expected: self.phase_qubits,
                        got: unitary.num_qubits(),
                    }
                    .into());
                }
                if !unitary.supports_control() {
                    return Err(SynthError::UnsupportedUnitary {
                        name: unitary.name().to_string(),
                        reason: "no controlled version available".into(),
                    });
                }
                Ok(RotationSource::Unitary(unitary.clone()))
            }
        }
    }
}

/// Composer for phase-estimation gate sequences.
#[derive(Debug, Clone)]
pub struct QpeComposer {
    config: QpeConfig,
}

impl QpeComposer {
    /// Wrap a configuration.
    pub fn new(config: QpeConfig) -> Self {
        Self { config }
    }

    /// The configuration this composer builds from.
    pub fn config(&self) -> &QpeConfig {
        &self.config
    }

    /// Emit the full estimation, including measurements.
    pub fn build(&self) -> SynthResult<GateSequence> {
        let rotation = self.config.validate()?;
        let cfg = &self.config;

        debug!(
            control_qubits = cfg.control_qubits,
            phase_qubits = cfg.phase_qubits,
            init_phase = cfg.init_phase,
            unitary = matches!(rotation, RotationSource::Unitary(_)),
            "composing QPE"
        );

        let mut seq = GateSequence::new(cfg.label());
        let control = seq.add_qreg("control", cfg.control_qubits);
        let phase = seq.add_qreg("phase", cfg.phase_qubits);
        let result = seq.add_creg("result", cfg.control_qubits);

        if cfg.init_phase {
            seq.x(phase[0])?;
        }
        for &q in &control {
            seq.h(q)?;
        }
        if cfg.insert_barrier {
            seq.barrier_all()?;
        }

        for (k, &ctrl) in control.iter().enumerate() {
            let power = 1u64 << k;
            match &rotation {
                RotationSource::Theta(theta) => {
                    let angle = TAU * theta * power as f64;
                    for &target in &phase {
                        seq.cp(angle, ctrl, target)?;
                    }
                }
                RotationSource::Unitary(unitary) => {
                    let powered = raise(unitary.as_ref(), power, cfg.phase_qubits)?;
                    let gate = ControlledPower {
                        unitary: powered,
                        power,
                        num_controls: 1,
                    };
                    seq.controlled_power(gate, &[ctrl], &phase)?;
                }
            }
            if cfg.insert_barrier {
                seq.barrier_all()?;
            }
        }

        let iqft = QftGenerator::new(
            QftConfig::new(cfg.control_qubits)
                .with_inverse(true)
                .with_swaps(true),
        )
        .build()?;
        seq.compose(&iqft, &control)?;

        if cfg.insert_barrier {
            seq.barrier_all()?;
        }
        for (&q, &c) in control.iter().zip(&result) {
            seq.measure(q, c)?;
        }

        debug!(instructions = seq.len(), depth = seq.depth(), "QPE complete");
        Ok(seq)
    }

    /// Emit the estimation without barriers and freeze it into an opaque gate.
    ///
    /// Measurements are dropped, so the gate carries no classical bits.
    pub fn build_gate(&self) -> SynthResult<OpaqueGate> {
        let composer = Self::new(self.config.clone().with_barriers(false));
        Ok(composer.build()?.to_gate()?)
    }
}

/// `unitary^power`, checked against the phase register width.
fn raise(
    unitary: &dyn UnitaryHandle,
    power: u64,
    width: u32,
) -> SynthResult<qutilities_ir::UnitaryRef> {
    let powered = unitary
        .power(power)
        .ok_or_else(|| SynthError::UnsupportedUnitary {
            name: unitary.name().to_string(),
            reason: format!("cannot raise to power {power}"),
        })?;
    if powered.num_qubits != width {
        return Err(ConfigError::UnitaryWidthMismatch {
            unitary: powered.name,
            expected: width,
            got: powered.num_qubits,
        }
        .into());
    }
    Ok(powered)
}
