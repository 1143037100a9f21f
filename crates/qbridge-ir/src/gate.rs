//! Gate library of the source framework.

use serde::{Deserialize, Serialize};

/// Standard gates with known semantics. Angles are in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(X)-dagger gate.
    SXdg,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Phase gate.
    P(f64),
    /// Universal single-qubit gate U(θ, φ, λ).
    U(f64, f64, f64),

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// Controlled-Hadamard gate.
    CH,
    /// SWAP gate.
    Swap,
    /// Controlled rotation around Z.
    CRz(f64),
    /// Controlled phase gate.
    CP(f64),
    /// ZZ rotation gate, exp(-iθ/2 Z⊗Z).
    RZZ(f64),

    // Three-qubit gates
    /// Toffoli gate.
    CCX,
    /// Fredkin gate.
    CSwap,
}

impl StandardGate {
    /// Lower-case gate name as used in OpenQASM `stdgates.inc`.
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::SXdg => "sxdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::U(..) => "u",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::CH => "ch",
            StandardGate::Swap => "swap",
            StandardGate::CRz(_) => "crz",
            StandardGate::CP(_) => "cp",
            StandardGate::RZZ(_) => "rzz",
            StandardGate::CCX => "ccx",
            StandardGate::CSwap => "cswap",
        }
    }

    /// Build a gate from its name and angle list.
    ///
    /// Returns `None` for unknown names or a wrong number of angles.
    /// `U` and `CX` are accepted as the OpenQASM built-in spellings.
    pub fn from_name(name: &str, params: &[f64]) -> Option<Self> {
        let gate = match (name, params) {
            ("id", []) => StandardGate::I,
            ("x", []) => StandardGate::X,
            ("y", []) => StandardGate::Y,
            ("z", []) => StandardGate::Z,
            ("h", []) => StandardGate::H,
            ("s", []) => StandardGate::S,
            ("sdg", []) => StandardGate::Sdg,
            ("t", []) => StandardGate::T,
            ("tdg", []) => StandardGate::Tdg,
            ("sx", []) => StandardGate::SX,
            ("sxdg", []) => StandardGate::SXdg,
            ("rx", &[theta]) => StandardGate::Rx(theta),
            ("ry", &[theta]) => StandardGate::Ry(theta),
            ("rz", &[theta]) => StandardGate::Rz(theta),
            ("p" | "phase", &[lambda]) => StandardGate::P(lambda),
            ("u" | "U" | "u3", &[theta, phi, lambda]) => StandardGate::U(theta, phi, lambda),
            ("cx" | "CX" | "cnot", []) => StandardGate::CX,
            ("cy", []) => StandardGate::CY,
            ("cz", []) => StandardGate::CZ,
            ("ch", []) => StandardGate::CH,
            ("swap", []) => StandardGate::Swap,
            ("crz", &[theta]) => StandardGate::CRz(theta),
            ("cp" | "cphase", &[lambda]) => StandardGate::CP(lambda),
            ("rzz", &[theta]) => StandardGate::RZZ(theta),
            ("ccx" | "toffoli", []) => StandardGate::CCX,
            ("cswap" | "fredkin", []) => StandardGate::CSwap,
            _ => return None,
        };
        Some(gate)
    }

    /// `(qubits, angles)` expected by a library gate name.
    pub fn signature(name: &str) -> Option<(u32, usize)> {
        let signature = match name {
            "id" | "x" | "y" | "z" | "h" | "s" | "sdg" | "t" | "tdg" | "sx" | "sxdg" => (1, 0),
            "rx" | "ry" | "rz" | "p" | "phase" => (1, 1),
            "u" | "U" | "u3" => (1, 3),
            "cx" | "CX" | "cnot" | "cy" | "cz" | "ch" | "swap" => (2, 0),
            "crz" | "cp" | "cphase" | "rzz" => (2, 1),
            "ccx" | "toffoli" | "cswap" | "fredkin" => (3, 0),
            _ => return None,
        };
        Some(signature)
    }

    /// Number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::SX
            | StandardGate::SXdg
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::P(_)
            | StandardGate::U(..) => 1,

            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CH
            | StandardGate::Swap
            | StandardGate::CRz(_)
            | StandardGate::CP(_)
            | StandardGate::RZZ(_) => 2,

            StandardGate::CCX | StandardGate::CSwap => 3,
        }
    }

    /// Angles carried by this gate, in declaration order.
    pub fn parameters(&self) -> Vec<f64> {
        match *self {
            StandardGate::Rx(t)
            | StandardGate::Ry(t)
            | StandardGate::Rz(t)
            | StandardGate::P(t)
            | StandardGate::CRz(t)
            | StandardGate::CP(t)
            | StandardGate::RZZ(t) => vec![t],
            StandardGate::U(theta, phi, lambda) => vec![theta, phi, lambda],
            _ => vec![],
        }
    }

    /// Whether the gate carries at least one angle.
    pub fn is_parameterized(&self) -> bool {
        !self.parameters().is_empty()
    }
}

/// An opaque gate the source framework knows only by name and arity.
///
/// No decomposition is known for custom gates; converters must reject them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomGate {
    /// The name of the gate.
    pub name: String,
    /// The number of qubits it operates on.
    pub num_qubits: u32,
    /// Angles of the gate, in radians.
    pub params: Vec<f64>,
}

impl CustomGate {
    /// Create a new custom gate.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            params: vec![],
        }
    }

    /// Attach angles to the gate.
    #[must_use]
    pub fn with_params(mut self, params: Vec<f64>) -> Self {
        self.params = params;
        self
    }
}

/// Either a standard or a custom gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// A library gate with known semantics.
    Standard(StandardGate),
    /// An opaque gate.
    Custom(CustomGate),
}

impl Gate {
    /// Gate name.
    pub fn name(&self) -> &str {
        match self {
            Gate::Standard(g) => g.name(),
            Gate::Custom(g) => &g.name,
        }
    }

    /// Number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            Gate::Standard(g) => g.num_qubits(),
            Gate::Custom(g) => g.num_qubits,
        }
    }

    /// Angles carried by the gate.
    pub fn parameters(&self) -> Vec<f64> {
        match self {
            Gate::Standard(g) => g.parameters(),
            Gate::Custom(g) => g.params.clone(),
        }
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::Standard(gate)
    }
}

impl From<CustomGate> for Gate {
    fn from(gate: CustomGate) -> Self {
        Gate::Custom(gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_from_name_roundtrips_name() {
        let gates = [
            StandardGate::I,
            StandardGate::Sdg,
            StandardGate::Rx(0.25),
            StandardGate::U(0.1, 0.2, 0.3),
            StandardGate::CRz(PI),
            StandardGate::RZZ(-1.0),
            StandardGate::CSwap,
        ];
        for gate in gates {
            let rebuilt = StandardGate::from_name(gate.name(), &gate.parameters());
            assert_eq!(rebuilt, Some(gate));
        }
    }

    #[test]
    fn test_from_name_rejects_wrong_arity() {
        assert_eq!(StandardGate::from_name("rx", &[]), None);
        assert_eq!(StandardGate::from_name("h", &[1.0]), None);
        assert_eq!(StandardGate::from_name("frobnicate", &[]), None);
    }

    #[test]
    fn test_builtin_spellings() {
        assert_eq!(StandardGate::from_name("CX", &[]), Some(StandardGate::CX));
        assert_eq!(
            StandardGate::from_name("U", &[1.0, 2.0, 3.0]),
            Some(StandardGate::U(1.0, 2.0, 3.0))
        );
    }

    #[test]
    fn test_signature_matches_gate() {
        for gate in [StandardGate::Tdg, StandardGate::CP(0.1), StandardGate::CCX] {
            let (qubits, params) = StandardGate::signature(gate.name()).unwrap();
            assert_eq!(qubits, gate.num_qubits());
            assert_eq!(params, gate.parameters().len());
        }
        assert_eq!(StandardGate::signature("oracle"), None);
    }

    #[test]
    fn test_num_qubits() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::CRz(0.5).num_qubits(), 2);
        assert_eq!(StandardGate::CCX.num_qubits(), 3);
        assert_eq!(Gate::from(CustomGate::new("oracle", 4)).num_qubits(), 4);
    }

    #[test]
    fn test_custom_gate_params() {
        let gate = Gate::from(CustomGate::new("mystery", 1).with_params(vec![0.5]));
        assert_eq!(gate.name(), "mystery");
        assert_eq!(gate.parameters(), vec![0.5]);
    }
}
