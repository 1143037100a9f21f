//! Gate-set canonicalization.
//!
//! A [`Decomposer`] rewrites a source circuit so that every instruction is
//! named in a given basis. [`BasisTranslator`] is the built-in one: a fixed
//! rule table applied recursively until each gate lands in the basis.

use std::f64::consts::PI;

use qbridge_ir::{Circuit, Gate, Instruction, InstructionKind, QubitId, StandardGate};
use tracing::trace;

use crate::error::{ConvertError, ConvertResult};
use crate::gate_set::MEASURE;

/// Rewrites circuits into a basis of instruction names.
///
/// Implementations must keep the qubit and classical slot counts of the
/// input. They fail with [`ConvertError::UnsupportedInstruction`] when an
/// instruction has no expression in the basis.
pub trait Decomposer: Send + Sync {
    fn decompose(&self, circuit: &Circuit, basis: &[&str]) -> ConvertResult<Circuit>;
}

/// Rule-based basis translation.
///
/// Barriers are dropped. Resets and custom gates have no rule and are
/// rejected. Identity rewrites only: no gate cancellation or merging.
#[derive(Debug, Clone)]
pub struct BasisTranslator {
    max_depth: usize,
}

impl BasisTranslator {
    pub const DEFAULT_MAX_DEPTH: usize = 8;

    pub fn new() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    /// Limit on nested rule applications per source gate.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn expand(
        &self,
        gate: StandardGate,
        qubits: &[QubitId],
        basis: &[&str],
        depth: usize,
        out: &mut Vec<Instruction>,
    ) -> ConvertResult<()> {
        if basis.contains(&gate.name()) {
            out.push(Instruction::gate(gate, qubits.iter().copied()));
            return Ok(());
        }
        if depth >= self.max_depth {
            return Err(ConvertError::unsupported(gate.name()));
        }
        let Some(steps) = rule(gate, qubits) else {
            return Err(ConvertError::unsupported(gate.name()));
        };
        trace!("Expanding {} into {} steps", gate.name(), steps.len());
        for (step, operands) in steps {
            self.expand(step, &operands, basis, depth + 1, out)?;
        }
        Ok(())
    }
}

impl Default for BasisTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl Decomposer for BasisTranslator {
    fn decompose(&self, circuit: &Circuit, basis: &[&str]) -> ConvertResult<Circuit> {
        let mut result = Circuit::new(circuit.name());
        for reg in circuit.qregs() {
            result.add_qreg(reg.name(), reg.size())?;
        }
        for reg in circuit.cregs() {
            result.add_creg(reg.name(), reg.size())?;
        }

        let mut expanded = Vec::new();
        for inst in circuit.instructions() {
            match &inst.kind {
                InstructionKind::Gate(Gate::Standard(gate)) => {
                    expanded.clear();
                    self.expand(*gate, &inst.qubits, basis, 0, &mut expanded)?;
                    for step in expanded.drain(..) {
                        result.push(step)?;
                    }
                }
                InstructionKind::Gate(Gate::Custom(custom)) => {
                    return Err(ConvertError::unsupported(custom.name.as_str()));
                }
                InstructionKind::Measure if basis.contains(&MEASURE) => {
                    result.push(inst.clone())?;
                }
                InstructionKind::Barrier => {}
                InstructionKind::Measure | InstructionKind::Reset => {
                    return Err(ConvertError::unsupported(inst.name()));
                }
            }
        }
        Ok(result)
    }
}

type Step = (StandardGate, Vec<QubitId>);

/// One level of rewriting, in application order. Equal up to global phase.
#[allow(clippy::too_many_lines)]
fn rule(gate: StandardGate, qubits: &[QubitId]) -> Option<Vec<Step>> {
    use StandardGate as G;

    let one = |g: StandardGate| (g, vec![qubits[0]]);
    let on = |g: StandardGate, q: &[usize]| (g, q.iter().map(|&i| qubits[i]).collect());

    let steps = match gate {
        G::I => vec![],
        G::X => vec![one(G::Rx(PI))],
        G::Y => vec![one(G::Ry(PI))],
        G::Z => vec![one(G::S), one(G::S)],
        G::H => vec![one(G::Ry(PI / 2.0)), one(G::X)],
        G::S => vec![one(G::Rz(PI / 2.0))],
        G::Sdg => vec![one(G::Z), one(G::S)],
        G::T => vec![one(G::Rz(PI / 4.0))],
        G::Tdg => vec![one(G::Rz(-PI / 4.0))],
        G::SX => vec![one(G::Rx(PI / 2.0))],
        G::SXdg => vec![one(G::Rx(-PI / 2.0))],
        G::Rx(theta) => vec![one(G::H), one(G::Rz(theta)), one(G::H)],
        G::Ry(theta) => vec![one(G::Sdg), one(G::Rx(theta)), one(G::S)],
        G::Rz(theta) => vec![one(G::H), one(G::Rx(theta)), one(G::H)],
        G::P(lambda) => vec![one(G::Rz(lambda))],
        G::U(theta, phi, lambda) => {
            vec![one(G::Rz(lambda)), one(G::Ry(theta)), one(G::Rz(phi))]
        }

        G::CX => vec![on(G::H, &[1]), on(G::CZ, &[0, 1]), on(G::H, &[1])],
        G::CZ => vec![on(G::H, &[1]), on(G::CX, &[0, 1]), on(G::H, &[1])],
        G::CY => vec![on(G::Sdg, &[1]), on(G::CX, &[0, 1]), on(G::S, &[1])],
        G::CH => vec![
            on(G::S, &[1]),
            on(G::H, &[1]),
            on(G::T, &[1]),
            on(G::CX, &[0, 1]),
            on(G::Tdg, &[1]),
            on(G::H, &[1]),
            on(G::Sdg, &[1]),
        ],
        G::Swap => vec![
            on(G::CX, &[0, 1]),
            on(G::CX, &[1, 0]),
            on(G::CX, &[0, 1]),
        ],
        G::CRz(theta) => vec![
            on(G::Rz(theta / 2.0), &[1]),
            on(G::CX, &[0, 1]),
            on(G::Rz(-theta / 2.0), &[1]),
            on(G::CX, &[0, 1]),
        ],
        G::CP(lambda) => vec![on(G::CRz(lambda), &[0, 1]), on(G::Rz(lambda / 2.0), &[0])],
        G::RZZ(theta) => vec![
            on(G::CX, &[0, 1]),
            on(G::Rz(theta), &[1]),
            on(G::CX, &[0, 1]),
        ],

        G::CCX => vec![
            on(G::H, &[2]),
            on(G::CX, &[1, 2]),
            on(G::Tdg, &[2]),
            on(G::CX, &[0, 2]),
            on(G::T, &[2]),
            on(G::CX, &[1, 2]),
            on(G::Tdg, &[2]),
            on(G::CX, &[0, 2]),
            on(G::T, &[1]),
            on(G::T, &[2]),
            on(G::H, &[2]),
            on(G::CX, &[0, 1]),
            on(G::T, &[0]),
            on(G::Tdg, &[1]),
            on(G::CX, &[0, 1]),
        ],
        G::CSwap => vec![
            on(G::CX, &[2, 1]),
            on(G::CCX, &[0, 1, 2]),
            on(G::CX, &[2, 1]),
        ],
    };
    Some(steps)
}
