//! Lowering of the syntax tree into a source-framework circuit.

use rustc_hash::FxHashMap;

use qbridge_ir::{Circuit, ClbitId, CustomGate, Instruction, QubitId, StandardGate};

use crate::ast::{GateCall, Operand, Program, Statement};
use crate::error::{ParseError, ParseResult};

/// Lower a program to a circuit, keeping register names and order.
pub(crate) fn lower_to_circuit(program: &Program) -> ParseResult<Circuit> {
    let mut lowerer = Lowerer::new();
    for statement in &program.statements {
        lowerer.line = statement.line;
        lowerer.lower_statement(&statement.node)?;
    }
    Ok(lowerer.circuit)
}

/// Slot range of a declared register.
#[derive(Clone, Copy)]
struct Slots {
    offset: u32,
    size: u32,
}

struct Lowerer {
    circuit: Circuit,
    qregs: FxHashMap<String, Slots>,
    cregs: FxHashMap<String, Slots>,
    line: usize,
}

impl Lowerer {
    fn new() -> Self {
        Self {
            circuit: Circuit::new("main"),
            qregs: FxHashMap::default(),
            cregs: FxHashMap::default(),
            line: 0,
        }
    }

    fn lower_statement(&mut self, statement: &Statement) -> ParseResult<()> {
        match statement {
            Statement::Include(_) => {}
            Statement::QubitDecl { name, size } => {
                let register = self.circuit.add_qreg(name.as_str(), *size)?;
                self.qregs.insert(
                    name.clone(),
                    Slots {
                        offset: register.offset(),
                        size: register.size(),
                    },
                );
            }
            Statement::BitDecl { name, size } => {
                let register = self.circuit.add_creg(name.as_str(), *size)?;
                self.cregs.insert(
                    name.clone(),
                    Slots {
                        offset: register.offset(),
                        size: register.size(),
                    },
                );
            }
            Statement::Gate(call) => self.lower_gate_call(call)?,
            Statement::Measure { source, target } => {
                let Some(target) = target else {
                    return Err(ParseError::Unsupported {
                        line: self.line,
                        what: format!("measurement of {source} without a classical target"),
                    });
                };
                let qubits = Self::resolve(&self.qregs, source, self.line)?;
                let clbits = Self::resolve(&self.cregs, target, self.line)?;
                if qubits.len() != clbits.len() {
                    return Err(ParseError::SizeMismatch {
                        line: self.line,
                        message: format!(
                            "cannot measure {} qubits into {} bits",
                            qubits.len(),
                            clbits.len()
                        ),
                    });
                }
                for (q, c) in qubits.into_iter().zip(clbits) {
                    self.circuit.measure(QubitId(q), ClbitId(c))?;
                }
            }
            Statement::Reset(operand) => {
                for q in Self::resolve(&self.qregs, operand, self.line)? {
                    self.circuit.reset(QubitId(q))?;
                }
            }
            Statement::Barrier(operands) => {
                if operands.is_empty() {
                    self.circuit.barrier_all()?;
                } else {
                    let mut qubits = Vec::new();
                    for operand in operands {
                        for q in Self::resolve(&self.qregs, operand, self.line)? {
                            if !qubits.contains(&QubitId(q)) {
                                qubits.push(QubitId(q));
                            }
                        }
                    }
                    self.circuit.barrier(qubits)?;
                }
            }
        }
        Ok(())
    }

    fn lower_gate_call(&mut self, call: &GateCall) -> ParseResult<()> {
        let params = call
            .params
            .iter()
            .map(|p| {
                p.as_f64().ok_or_else(|| ParseError::InvalidExpression {
                    line: self.line,
                    expression: p.to_string(),
                })
            })
            .collect::<ParseResult<Vec<f64>>>()?;

        if let Some((num_qubits, num_params)) = StandardGate::signature(&call.name) {
            if params.len() != num_params {
                return Err(ParseError::WrongParameterCount {
                    gate: call.name.clone(),
                    expected: num_params,
                    got: params.len(),
                });
            }
            if call.operands.len() != num_qubits as usize {
                return Err(ParseError::WrongQubitCount {
                    gate: call.name.clone(),
                    expected: num_qubits as usize,
                    got: call.operands.len(),
                });
            }
        }

        let operands = call
            .operands
            .iter()
            .map(|op| Self::resolve(&self.qregs, op, self.line))
            .collect::<ParseResult<Vec<_>>>()?;

        for qubits in broadcast(&operands, self.line)? {
            let instruction = match StandardGate::from_name(&call.name, &params) {
                Some(gate) => Instruction::gate(gate, qubits),
                None => {
                    let arity =
                        u32::try_from(qubits.len()).map_err(|_| qbridge_ir::IrError::TooManySlots)?;
                    let gate =
                        CustomGate::new(call.name.as_str(), arity).with_params(params.clone());
                    Instruction::gate(gate, qubits)
                }
            };
            self.circuit.push(instruction)?;
        }
        Ok(())
    }

    /// Global slots an operand refers to.
    fn resolve(
        registers: &FxHashMap<String, Slots>,
        operand: &Operand,
        line: usize,
    ) -> ParseResult<Vec<u32>> {
        let slots = registers
            .get(&operand.register)
            .ok_or_else(|| ParseError::UndefinedRegister {
                line,
                name: operand.register.clone(),
            })?;
        match operand.index {
            Some(index) if index < slots.size => Ok(vec![slots.offset + index]),
            Some(index) => Err(qbridge_ir::IrError::IndexOutOfRange {
                register: operand.register.clone(),
                index,
                size: slots.size,
            }
            .into()),
            None => Ok((slots.offset..slots.offset + slots.size).collect()),
        }
    }
}

/// Expand whole-register operands into one operand tuple per index.
fn broadcast(operands: &[Vec<u32>], line: usize) -> ParseResult<Vec<Vec<QubitId>>> {
    let width = operands
        .iter()
        .map(Vec::len)
        .filter(|&len| len != 1)
        .try_fold(None, |width, len| match width {
            None => Ok(Some(len)),
            Some(w) if w == len => Ok(Some(w)),
            Some(w) => Err(ParseError::SizeMismatch {
                line,
                message: format!("cannot broadcast registers of sizes {w} and {len}"),
            }),
        })?
        .unwrap_or(1);

    Ok((0..width)
        .map(|i| {
            operands
                .iter()
                .map(|slots| QubitId(if slots.len() == 1 { slots[0] } else { slots[i] }))
                .collect()
        })
        .collect())
}
