//! QASM3 emitter for serializing gate sequences.

use std::f64::consts::PI;

use rustc_hash::{FxHashMap, FxHashSet};

use qutilities_ir::{
    ClbitId, Gate, GateSequence, Instruction, InstructionKind, QubitId, StandardGate,
    UnitaryDefinition,
};

use crate::error::{EmitError, EmitResult};

/// Identifiers a gate definition may not take.
const RESERVED: &[&str] = &[
    "barrier", "bit", "c", "ctrl", "cp", "cx", "gate", "h", "inv", "measure", "negctrl", "pi",
    "pow", "q", "qubit", "swap", "x",
];

/// Largest power-of-two denominator tried when printing angles as pi fractions.
const MAX_PI_DENOMINATOR_BITS: i32 = 20;

/// Emit a gate sequence as QASM3 source code.
///
/// Opaque gates and gate-defined controlled powers become `gate`
/// definitions ahead of the register declarations.
pub fn emit(sequence: &GateSequence) -> EmitResult<String> {
    let mut emitter = Emitter::new();
    emitter.emit_sequence(sequence)
}

/// Format an angle, as a multiple of `pi` over a power of two when exact.
pub fn format_angle(value: f64) -> String {
    if value == 0.0 {
        return "0".into();
    }
    let ratio = value / PI;
    for bits in 0..=MAX_PI_DENOMINATOR_BITS {
        let den = 2f64.powi(bits);
        let num = ratio * den;
        let rounded = num.round();
        if rounded != 0.0 && (num - rounded).abs() < 1e-9 {
            let den = 1u64 << bits;
            return match (rounded as i64, den) {
                (1, 1) => "pi".into(),
                (-1, 1) => "-pi".into(),
                (m, 1) => format!("{m}*pi"),
                (1, d) => format!("pi/{d}"),
                (-1, d) => format!("-pi/{d}"),
                (m, d) => format!("{m}*pi/{d}"),
            };
        }
    }
    format!("{value}")
}

/// How operands are spelled in the current scope.
#[derive(Clone, Copy)]
enum Scope {
    /// Top-level register `q[i]`.
    Register,
    /// Gate-definition argument `a{i}`.
    Argument,
}

impl Scope {
    fn qubit(self, qubit: QubitId) -> String {
        match self {
            Scope::Register => format!("q[{}]", qubit.0),
            Scope::Argument => format!("a{}", qubit.0),
        }
    }
}

/// QASM3 emitter.
struct Emitter {
    output: String,
    indent: usize,
    /// Identifier of each defined gate, keyed by label.
    defined: FxHashMap<String, String>,
    taken: FxHashSet<String>,
}

#[allow(clippy::unused_self)]
impl Emitter {
    fn new() -> Self {
        Self {
            output: String::new(),
            indent: 0,
            defined: FxHashMap::default(),
            taken: RESERVED.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    fn emit_sequence(&mut self, sequence: &GateSequence) -> EmitResult<String> {
        // Version
        self.writeln("OPENQASM 3.0;");
        self.writeln("include \"stdgates.inc\";");
        self.writeln(&format!("// {}", sequence.label()));
        self.writeln("");

        // Gate definitions, innermost first
        let mark = self.output.len();
        self.define_all(sequence.instructions())?;
        if self.output.len() > mark {
            self.writeln("");
        }

        // Qubit declarations
        let num_qubits = sequence.num_qubits();
        if num_qubits > 0 {
            self.writeln(&format!("qubit[{num_qubits}] q;"));
        }

        // Classical bit declarations
        let num_clbits = sequence.num_clbits();
        if num_clbits > 0 {
            self.writeln(&format!("bit[{num_clbits}] c;"));
        }

        if num_qubits > 0 || num_clbits > 0 {
            self.writeln("");
        }

        // Instructions
        for instruction in sequence.instructions() {
            self.emit_instruction(instruction, Scope::Register);
        }

        Ok(std::mem::take(&mut self.output))
    }

    fn define_all(&mut self, instructions: &[Instruction]) -> EmitResult<()> {
        for inst in instructions {
            match inst.as_gate() {
                Some(Gate::Opaque(gate)) => {
                    self.define(gate.label(), gate.num_qubits(), gate.instructions())?;
                }
                Some(Gate::ControlledPower(cp)) => match &cp.unitary.definition {
                    UnitaryDefinition::Gates(body) => {
                        self.define(&cp.unitary.name, cp.unitary.num_qubits, body)?;
                    }
                    UnitaryDefinition::Permutation(_) => {
                        return Err(EmitError::UnsupportedDefinition {
                            name: cp.unitary.name.clone(),
                        });
                    }
                },
                _ => {}
            }
        }
        Ok(())
    }

    fn define(&mut self, label: &str, num_qubits: u32, body: &[Instruction]) -> EmitResult<()> {
        if self.defined.contains_key(label) {
            return Ok(());
        }
        self.define_all(body)?;

        let ident = self.fresh_identifier(label);
        self.defined.insert(label.to_string(), ident.clone());

        let args = (0..num_qubits)
            .map(|i| format!("a{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        self.writeln(&format!("gate {ident} {args} {{"));
        self.indent += 1;
        for inst in body {
            self.emit_instruction(inst, Scope::Argument);
        }
        self.indent -= 1;
        self.writeln("}");
        Ok(())
    }

    fn fresh_identifier(&mut self, label: &str) -> String {
        let base = identifier(label);
        let mut ident = base.clone();
        let mut suffix = 1;
        while self.taken.contains(&ident) {
            ident = format!("{base}_{suffix}");
            suffix += 1;
        }
        self.taken.insert(ident.clone());
        ident
    }

    fn emit_instruction(&mut self, instruction: &Instruction, scope: Scope) {
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let name = self.emit_gate_name(gate);
                let qubits = self.emit_qubits(&instruction.qubits, scope);
                self.writeln(&format!("{name} {qubits};"));
            }

            InstructionKind::Measure => {
                for (q, c) in instruction.qubits.iter().zip(instruction.clbits.iter()) {
                    let clbit = self.emit_clbit(*c);
                    self.writeln(&format!("{clbit} = measure {};", scope.qubit(*q)));
                }
            }

            InstructionKind::Barrier => {
                let qubits = self.emit_qubits(&instruction.qubits, scope);
                if qubits.is_empty() {
                    self.writeln("barrier;");
                } else {
                    self.writeln(&format!("barrier {qubits};"));
                }
            }
        }
    }

    fn emit_gate_name(&self, gate: &Gate) -> String {
        match gate {
            Gate::Standard(std) => match std {
                StandardGate::H => "h".into(),
                StandardGate::X => "x".into(),
                StandardGate::CX => "cx".into(),
                StandardGate::CP(theta) => format!("cp({})", format_angle(*theta)),
                StandardGate::Swap => "swap".into(),
                StandardGate::MCX(0) => "x".into(),
                StandardGate::MCX(1) => "cx".into(),
                StandardGate::MCX(n) => format!("ctrl({n}) @ x"),
            },
            Gate::Opaque(opaque) => self.lookup(opaque.label()),
            Gate::ControlledPower(cp) => {
                let target = self.lookup(&cp.unitary.name);
                match cp.num_controls {
                    1 => format!("ctrl @ {target}"),
                    n => format!("ctrl({n}) @ {target}"),
                }
            }
        }
    }

    fn lookup(&self, label: &str) -> String {
        self.defined
            .get(label)
            .cloned()
            .unwrap_or_else(|| identifier(label))
    }

    fn emit_qubits(&self, qubits: &[QubitId], scope: Scope) -> String {
        qubits
            .iter()
            .map(|q| scope.qubit(*q))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn emit_clbit(&self, clbit: ClbitId) -> String {
        format!("c[{}]", clbit.0)
    }

    fn writeln(&mut self, line: &str) {
        let indent = "    ".repeat(self.indent);
        self.output.push_str(&indent);
        self.output.push_str(line);
        self.output.push('\n');
    }
}

/// Turn a free-form label into a QASM identifier.
fn identifier(label: &str) -> String {
    let mut ident = String::new();
    for ch in label.chars() {
        if ch.is_ascii_alphanumeric() {
            ident.push(ch.to_ascii_lowercase());
        } else if !ident.is_empty() && !ident.ends_with('_') {
            ident.push('_');
        }
    }
    while ident.ends_with('_') {
        ident.pop();
    }
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert_str(0, "g_");
    }
    ident
}
