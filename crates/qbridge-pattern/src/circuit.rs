//! Target circuits.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{PatternError, PatternResult};
use crate::instruction::Instruction;
use crate::kind::Kind;

/// A fixed-width circuit in the target vocabulary.
///
/// Every instruction is checked on insertion, so a `PatternCircuit` never
/// refers to a qubit or classical bit it does not have.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternCircuit {
    width: usize,
    num_clbits: usize,
    instructions: Vec<Instruction>,
}

impl PatternCircuit {
    /// Create an empty circuit on `width` qubits with no classical bits.
    pub fn new(width: usize) -> Self {
        Self::with_clbits(width, 0)
    }

    /// Create an empty circuit with `num_clbits` classical bits.
    pub fn with_clbits(width: usize, num_clbits: usize) -> Self {
        Self {
            width,
            num_clbits,
            instructions: Vec::new(),
        }
    }

    /// Append an instruction after validating its operands.
    pub fn push(&mut self, instruction: Instruction) -> PatternResult<&mut Self> {
        self.validate(&instruction)?;
        self.instructions.push(instruction);
        Ok(self)
    }

    fn validate(&self, instruction: &Instruction) -> PatternResult<()> {
        let kind = instruction.kind();
        let mut seen = FxHashSet::default();
        for qubit in instruction.qubits() {
            if qubit >= self.width {
                return Err(PatternError::QubitOutOfRange {
                    kind,
                    qubit,
                    width: self.width,
                });
            }
            if !seen.insert(qubit) {
                return Err(PatternError::DuplicateOperand { kind, qubit });
            }
        }
        if let Some(clbit) = instruction.clbit() {
            if clbit >= self.num_clbits {
                return Err(PatternError::ClbitOutOfRange {
                    kind,
                    clbit,
                    num_clbits: self.num_clbits,
                });
            }
        }
        if let Some(value) = instruction.angle() {
            if !value.is_finite() {
                return Err(PatternError::NonFiniteAngle { kind, value });
            }
        }
        Ok(())
    }

    pub fn x(&mut self, target: usize) -> PatternResult<&mut Self> {
        self.push(Instruction::X { target })
    }

    pub fn y(&mut self, target: usize) -> PatternResult<&mut Self> {
        self.push(Instruction::Y { target })
    }

    pub fn z(&mut self, target: usize) -> PatternResult<&mut Self> {
        self.push(Instruction::Z { target })
    }

    pub fn h(&mut self, target: usize) -> PatternResult<&mut Self> {
        self.push(Instruction::H { target })
    }

    pub fn s(&mut self, target: usize) -> PatternResult<&mut Self> {
        self.push(Instruction::S { target })
    }

    pub fn i(&mut self, target: usize) -> PatternResult<&mut Self> {
        self.push(Instruction::I { target })
    }

    /// X rotation by `angle` radians.
    pub fn rx(&mut self, target: usize, angle: f64) -> PatternResult<&mut Self> {
        self.push(Instruction::Rx { target, angle })
    }

    /// Y rotation by `angle` radians.
    pub fn ry(&mut self, target: usize, angle: f64) -> PatternResult<&mut Self> {
        self.push(Instruction::Ry { target, angle })
    }

    /// Z rotation by `angle` radians.
    pub fn rz(&mut self, target: usize, angle: f64) -> PatternResult<&mut Self> {
        self.push(Instruction::Rz { target, angle })
    }

    pub fn cnot(&mut self, control: usize, target: usize) -> PatternResult<&mut Self> {
        self.push(Instruction::Cnot { control, target })
    }

    pub fn cz(&mut self, control: usize, target: usize) -> PatternResult<&mut Self> {
        self.push(Instruction::Cz { control, target })
    }

    /// Controlled Z rotation by `angle` half-turns.
    pub fn rzz(&mut self, control: usize, target: usize, angle: f64) -> PatternResult<&mut Self> {
        self.push(Instruction::Rzz {
            control,
            target,
            angle,
        })
    }

    pub fn swap(&mut self, a: usize, b: usize) -> PatternResult<&mut Self> {
        self.push(Instruction::Swap { targets: [a, b] })
    }

    pub fn ccx(&mut self, c1: usize, c2: usize, target: usize) -> PatternResult<&mut Self> {
        self.push(Instruction::Ccx {
            controls: [c1, c2],
            target,
        })
    }

    /// Measure without recording into a classical bit.
    pub fn m(&mut self, target: usize) -> PatternResult<&mut Self> {
        self.push(Instruction::M {
            target,
            clbit: None,
        })
    }

    /// Measure `target` into classical bit `clbit`.
    pub fn measure(&mut self, target: usize, clbit: usize) -> PatternResult<&mut Self> {
        self.push(Instruction::M {
            target,
            clbit: Some(clbit),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Instruction count per kind.
    pub fn kind_counts(&self) -> BTreeMap<Kind, usize> {
        let mut counts = BTreeMap::new();
        for inst in &self.instructions {
            *counts.entry(inst.kind()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let mut circuit = PatternCircuit::with_clbits(3, 2);
        circuit
            .h(0)
            .unwrap()
            .cnot(0, 1)
            .unwrap()
            .rzz(1, 2, 0.5)
            .unwrap()
            .measure(2, 1)
            .unwrap();
        assert_eq!(circuit.len(), 4);
        assert_eq!(circuit.width(), 3);
        assert_eq!(circuit.kind_counts()[&Kind::Cnot], 1);
        assert_eq!(circuit.instructions()[3].clbit(), Some(1));
    }

    #[test]
    fn test_rejects_out_of_range() {
        let mut circuit = PatternCircuit::new(2);
        assert!(matches!(
            circuit.x(2),
            Err(PatternError::QubitOutOfRange { qubit: 2, width: 2, .. })
        ));
        assert!(matches!(
            circuit.measure(0, 0),
            Err(PatternError::ClbitOutOfRange { clbit: 0, .. })
        ));
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_rejects_duplicates_and_nan() {
        let mut circuit = PatternCircuit::new(3);
        assert!(matches!(
            circuit.ccx(0, 1, 0),
            Err(PatternError::DuplicateOperand { qubit: 0, .. })
        ));
        assert!(matches!(
            circuit.rz(0, f64::NAN),
            Err(PatternError::NonFiniteAngle { .. })
        ));
    }

    #[test]
    fn test_unrecorded_measure() {
        let mut circuit = PatternCircuit::new(1);
        circuit.m(0).unwrap();
        assert_eq!(circuit.instructions()[0].clbit(), None);
    }
}
