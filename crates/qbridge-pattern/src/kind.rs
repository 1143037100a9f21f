//! Instruction kinds of the target vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PatternError;

/// Tag of a target instruction.
///
/// The vocabulary is closed: every target circuit is made only of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Kind {
    X,
    Y,
    Z,
    H,
    S,
    I,
    Rx,
    Ry,
    Rz,
    Cnot,
    Cz,
    Rzz,
    Swap,
    Ccx,
    M,
}

impl Kind {
    /// Every kind, in vocabulary order.
    pub const ALL: [Kind; 15] = [
        Kind::X,
        Kind::Y,
        Kind::Z,
        Kind::H,
        Kind::S,
        Kind::I,
        Kind::Rx,
        Kind::Ry,
        Kind::Rz,
        Kind::Cnot,
        Kind::Cz,
        Kind::Rzz,
        Kind::Swap,
        Kind::Ccx,
        Kind::M,
    ];

    /// Upper-case vocabulary name.
    pub fn name(self) -> &'static str {
        match self {
            Kind::X => "X",
            Kind::Y => "Y",
            Kind::Z => "Z",
            Kind::H => "H",
            Kind::S => "S",
            Kind::I => "I",
            Kind::Rx => "RX",
            Kind::Ry => "RY",
            Kind::Rz => "RZ",
            Kind::Cnot => "CNOT",
            Kind::Cz => "CZ",
            Kind::Rzz => "RZZ",
            Kind::Swap => "SWAP",
            Kind::Ccx => "CCX",
            Kind::M => "M",
        }
    }

    /// Number of qubit operands.
    pub fn num_qubits(self) -> usize {
        match self {
            Kind::X
            | Kind::Y
            | Kind::Z
            | Kind::H
            | Kind::S
            | Kind::I
            | Kind::Rx
            | Kind::Ry
            | Kind::Rz
            | Kind::M => 1,
            Kind::Cnot | Kind::Cz | Kind::Rzz | Kind::Swap => 2,
            Kind::Ccx => 3,
        }
    }

    /// Number of angle parameters.
    pub fn num_params(self) -> usize {
        match self {
            Kind::Rx | Kind::Ry | Kind::Rz | Kind::Rzz => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Kind {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| PatternError::UnknownKind(s.to_string()))
    }
}
