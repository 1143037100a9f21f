//! Error types for the IR crate.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors that can occur while building a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit slot is not declared in the circuit.
    #[error("Qubit {qubit} not found in circuit{}", format_gate_context(.gate_name))]
    QubitNotFound {
        /// The qubit that was not found.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Classical bit slot is not declared in the circuit.
    #[error("Classical bit {clbit} not found in circuit{}", format_gate_context(.gate_name))]
    ClbitNotFound {
        /// The classical bit that was not found.
        clbit: ClbitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Operation requires a different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Measurement operands do not pair up.
    #[error("Measurement needs one classical bit per qubit, got {qubits} qubits and {clbits} bits")]
    MeasureArity {
        /// Number of qubit operands.
        qubits: usize,
        /// Number of classical operands.
        clbits: usize,
    },

    /// Duplicate qubit in operation.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Angle is NaN or infinite.
    #[error("Gate '{gate_name}' has non-finite angle {value}")]
    NonFiniteAngle {
        /// Name of the gate.
        gate_name: String,
        /// The offending value.
        value: f64,
    },

    /// A register with this name already exists.
    #[error("Register '{0}' is already declared")]
    DuplicateRegister(String),

    /// No register with this name exists.
    #[error("Register '{0}' is not declared")]
    UnknownRegister(String),

    /// Register index past the register's end.
    #[error("Index {index} out of range for register '{register}' of size {size}")]
    IndexOutOfRange {
        /// Register name.
        register: String,
        /// Requested index.
        index: u32,
        /// Register size.
        size: u32,
    },

    /// Register does not start where the previous one ends.
    #[error("Register '{register}' starts at slot {offset}, expected {expected}")]
    MisplacedRegister {
        /// Register name.
        register: String,
        /// Offset found.
        offset: u32,
        /// Offset implied by declaration order.
        expected: u32,
    },

    /// Slot count exceeds the addressable range.
    #[error("Circuit cannot hold more than {} slots", u32::MAX)]
    TooManySlots,
}

#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
