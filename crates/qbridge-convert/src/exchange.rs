//! Reading exchange documents into the target vocabulary.

use qbridge_pattern::{Instruction, PatternCircuit};
use qbridge_qasm::ast::{GateCall, Located, Operand, Program, Statement};
use qbridge_qasm::{ExchangeDocument, parse_program};

use crate::error::{ConvertError, ConvertResult};
use crate::gate_set::{CanonicalGateSet, MEASURE};
use crate::normalize::{CLBIT_REGISTER, QUBIT_REGISTER};

/// Parse an exchange document and lower it through the alias table.
///
/// Any failure is a [`ConvertError::MalformedExchangeDocument`]: documents
/// produced by the converter always read back.
pub fn lower_document(
    document: &ExchangeDocument,
    gate_set: &CanonicalGateSet,
) -> ConvertResult<PatternCircuit> {
    let program = parse_program(document.as_str())
        .map_err(|e| ConvertError::malformed(format!("parse error: {e}")))?;
    lower_program(&program, gate_set)
}

/// Lower a parsed program through the alias table.
pub fn lower_program(
    program: &Program,
    gate_set: &CanonicalGateSet,
) -> ConvertResult<PatternCircuit> {
    let mut lowering = Lowering {
        gate_set,
        width: None,
        num_clbits: None,
        circuit: None,
    };
    for statement in &program.statements {
        lowering
            .statement(statement)
            .map_err(|reason| ConvertError::malformed(format!("line {}: {reason}", statement.line)))?;
    }
    Ok(lowering.finish())
}

struct Lowering<'a> {
    gate_set: &'a CanonicalGateSet,
    width: Option<usize>,
    num_clbits: Option<usize>,
    /// Created at the first instruction; declarations must precede it.
    circuit: Option<PatternCircuit>,
}

impl Lowering<'_> {
    fn statement(&mut self, statement: &Located<Statement>) -> Result<(), String> {
        match &statement.node {
            Statement::Include(_) => Ok(()),
            Statement::QubitDecl { name, size } => {
                Self::declare(&mut self.width, QUBIT_REGISTER, name, *size, self.circuit.is_some())
            }
            Statement::BitDecl { name, size } => {
                Self::declare(&mut self.num_clbits, CLBIT_REGISTER, name, *size, self.circuit.is_some())
            }
            Statement::Gate(call) => self.gate(call),
            Statement::Measure { source, target } => self.measure(source, target.as_ref()),
            Statement::Reset(_) => Err("unexpected reset statement".into()),
            Statement::Barrier(_) => Err("unexpected barrier statement".into()),
        }
    }

    fn declare(
        slot: &mut Option<usize>,
        expected: &str,
        name: &str,
        size: u32,
        after_instructions: bool,
    ) -> Result<(), String> {
        if name != expected {
            return Err(format!("register '{name}' is not the canonical '{expected}'"));
        }
        if slot.is_some() {
            return Err(format!("register '{name}' declared twice"));
        }
        if after_instructions {
            return Err(format!("register '{name}' declared after instructions"));
        }
        *slot = Some(size as usize);
        Ok(())
    }

    fn empty(&self) -> PatternCircuit {
        PatternCircuit::with_clbits(self.width.unwrap_or(0), self.num_clbits.unwrap_or(0))
    }

    fn circuit(&mut self) -> &mut PatternCircuit {
        let empty = self.empty();
        self.circuit.get_or_insert(empty)
    }

    fn gate(&mut self, call: &GateCall) -> Result<(), String> {
        let alias = self
            .gate_set
            .lookup(&call.name)
            .filter(|a| a.source != MEASURE)
            .ok_or_else(|| format!("unknown gate '{}'", call.name))?;

        let params = call
            .params
            .iter()
            .map(|expr| {
                expr.as_f64()
                    .map(|v| alias.transform.apply(v))
                    .ok_or_else(|| format!("cannot evaluate parameter '{expr}'"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let qubits = call
            .operands
            .iter()
            .map(|op| slot(op, QUBIT_REGISTER))
            .collect::<Result<Vec<_>, _>>()?;

        let instruction = Instruction::from_parts(alias.target, &qubits, &params, None)
            .map_err(|e| e.to_string())?;
        self.circuit()
            .push(instruction)
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    fn measure(&mut self, source: &Operand, target: Option<&Operand>) -> Result<(), String> {
        let alias = self
            .gate_set
            .lookup(MEASURE)
            .ok_or_else(|| format!("'{MEASURE}' is not in the gate set"))?;
        let target = target.ok_or("measurement without a classical target")?;
        let qubit = slot(source, QUBIT_REGISTER)?;
        let clbit = slot(target, CLBIT_REGISTER)?;

        let instruction = Instruction::from_parts(alias.target, &[qubit], &[], Some(clbit))
            .map_err(|e| e.to_string())?;
        self.circuit()
            .push(instruction)
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    fn finish(self) -> PatternCircuit {
        let empty = self.empty();
        self.circuit.unwrap_or(empty)
    }
}

/// Index of a single-slot operand on the expected register.
fn slot(operand: &Operand, register: &str) -> Result<usize, String> {
    if operand.register != register {
        return Err(format!("operand '{operand}' is not on register '{register}'"));
    }
    operand
        .index
        .map(|i| i as usize)
        .ok_or_else(|| format!("operand '{operand}' addresses a whole register"))
}
