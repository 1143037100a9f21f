//! Target instructions over integer qubit indices.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{PatternError, PatternResult};
use crate::kind::Kind;

/// One operation of a target circuit.
///
/// Rotation angles of `Rx`, `Ry` and `Rz` are in radians. The `Rzz` angle is
/// in half-turns (multiples of pi).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "UPPERCASE")]
pub enum Instruction {
    X { target: usize },
    Y { target: usize },
    Z { target: usize },
    H { target: usize },
    S { target: usize },
    I { target: usize },
    Rx { target: usize, angle: f64 },
    Ry { target: usize, angle: f64 },
    Rz { target: usize, angle: f64 },
    Cnot { control: usize, target: usize },
    Cz { control: usize, target: usize },
    Rzz { control: usize, target: usize, angle: f64 },
    Swap { targets: [usize; 2] },
    Ccx { controls: [usize; 2], target: usize },
    M { target: usize, clbit: Option<usize> },
}

impl Instruction {
    /// Build an instruction from its kind and flat operand lists.
    ///
    /// Qubits are taken in the order control(s) first, then target.
    pub fn from_parts(
        kind: Kind,
        qubits: &[usize],
        params: &[f64],
        clbit: Option<usize>,
    ) -> PatternResult<Self> {
        if qubits.len() != kind.num_qubits() {
            return Err(PatternError::Arity {
                kind,
                expected: kind.num_qubits(),
                got: qubits.len(),
            });
        }
        if params.len() != kind.num_params() {
            return Err(PatternError::ParamCount {
                kind,
                expected: kind.num_params(),
                got: params.len(),
            });
        }
        let q = |i: usize| qubits[i];
        let angle = params.first().copied().unwrap_or_default();

        Ok(match kind {
            Kind::X => Instruction::X { target: q(0) },
            Kind::Y => Instruction::Y { target: q(0) },
            Kind::Z => Instruction::Z { target: q(0) },
            Kind::H => Instruction::H { target: q(0) },
            Kind::S => Instruction::S { target: q(0) },
            Kind::I => Instruction::I { target: q(0) },
            Kind::Rx => Instruction::Rx { target: q(0), angle },
            Kind::Ry => Instruction::Ry { target: q(0), angle },
            Kind::Rz => Instruction::Rz { target: q(0), angle },
            Kind::Cnot => Instruction::Cnot {
                control: q(0),
                target: q(1),
            },
            Kind::Cz => Instruction::Cz {
                control: q(0),
                target: q(1),
            },
            Kind::Rzz => Instruction::Rzz {
                control: q(0),
                target: q(1),
                angle,
            },
            Kind::Swap => Instruction::Swap {
                targets: [q(0), q(1)],
            },
            Kind::Ccx => Instruction::Ccx {
                controls: [q(0), q(1)],
                target: q(2),
            },
            Kind::M => Instruction::M {
                target: q(0),
                clbit,
            },
        })
    }

    pub fn kind(&self) -> Kind {
        match self {
            Instruction::X { .. } => Kind::X,
            Instruction::Y { .. } => Kind::Y,
            Instruction::Z { .. } => Kind::Z,
            Instruction::H { .. } => Kind::H,
            Instruction::S { .. } => Kind::S,
            Instruction::I { .. } => Kind::I,
            Instruction::Rx { .. } => Kind::Rx,
            Instruction::Ry { .. } => Kind::Ry,
            Instruction::Rz { .. } => Kind::Rz,
            Instruction::Cnot { .. } => Kind::Cnot,
            Instruction::Cz { .. } => Kind::Cz,
            Instruction::Rzz { .. } => Kind::Rzz,
            Instruction::Swap { .. } => Kind::Swap,
            Instruction::Ccx { .. } => Kind::Ccx,
            Instruction::M { .. } => Kind::M,
        }
    }

    /// Qubit operands, controls first.
    pub fn qubits(&self) -> Vec<usize> {
        match *self {
            Instruction::X { target }
            | Instruction::Y { target }
            | Instruction::Z { target }
            | Instruction::H { target }
            | Instruction::S { target }
            | Instruction::I { target }
            | Instruction::Rx { target, .. }
            | Instruction::Ry { target, .. }
            | Instruction::Rz { target, .. }
            | Instruction::M { target, .. } => vec![target],
            Instruction::Cnot { control, target }
            | Instruction::Cz { control, target }
            | Instruction::Rzz {
                control, target, ..
            } => vec![control, target],
            Instruction::Swap { targets } => targets.to_vec(),
            Instruction::Ccx { controls, target } => vec![controls[0], controls[1], target],
        }
    }

    /// The angle parameter, if the kind has one.
    pub fn angle(&self) -> Option<f64> {
        match *self {
            Instruction::Rx { angle, .. }
            | Instruction::Ry { angle, .. }
            | Instruction::Rz { angle, .. }
            | Instruction::Rzz { angle, .. } => Some(angle),
            _ => None,
        }
    }

    /// Classical bit written by a measurement.
    pub fn clbit(&self) -> Option<usize> {
        match *self {
            Instruction::M { clbit, .. } => clbit,
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let qubits = self
            .qubits()
            .iter()
            .map(|q| q.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        match (self.angle(), self.clbit()) {
            (Some(angle), _) => write!(f, "{}({qubits}, {angle})", self.kind()),
            (None, Some(clbit)) => write!(f, "{}({qubits} -> {clbit})", self.kind()),
            (None, None) => write!(f, "{}({qubits})", self.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts() {
        let inst = Instruction::from_parts(Kind::Rzz, &[3, 1], &[0.25], None).unwrap();
        assert_eq!(
            inst,
            Instruction::Rzz {
                control: 3,
                target: 1,
                angle: 0.25
            }
        );
        assert_eq!(inst.qubits(), vec![3, 1]);
        assert_eq!(inst.angle(), Some(0.25));

        let ccx = Instruction::from_parts(Kind::Ccx, &[0, 1, 2], &[], None).unwrap();
        assert_eq!(ccx.qubits(), vec![0, 1, 2]);
    }

    #[test]
    fn test_from_parts_shape_errors() {
        assert!(matches!(
            Instruction::from_parts(Kind::Cnot, &[0], &[], None),
            Err(PatternError::Arity { expected: 2, got: 1, .. })
        ));
        assert!(matches!(
            Instruction::from_parts(Kind::Rx, &[0], &[], None),
            Err(PatternError::ParamCount { expected: 1, got: 0, .. })
        ));
    }

    #[test]
    fn test_display() {
        let cnot = Instruction::Cnot {
            control: 0,
            target: 1,
        };
        assert_eq!(cnot.to_string(), "CNOT(0, 1)");
        let m = Instruction::M {
            target: 2,
            clbit: Some(0),
        };
        assert_eq!(m.to_string(), "M(2 -> 0)");
        let rx = Instruction::Rx {
            target: 0,
            angle: 0.5,
        };
        assert_eq!(rx.to_string(), "RX(0, 0.5)");
    }

    #[test]
    fn test_serde_tagged() {
        let inst = Instruction::Swap { targets: [1, 0] };
        let json = serde_json::to_string(&inst).unwrap();
        assert_eq!(json, r#"{"kind":"SWAP","targets":[1,0]}"#);
        let back: Instruction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, inst);
    }
}
