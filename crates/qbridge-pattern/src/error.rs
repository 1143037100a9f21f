//! Error types for the target framework.

use thiserror::Error;

use crate::backend::Backend;
use crate::kind::Kind;

/// Errors raised while building or executing target circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PatternError {
    /// Qubit index past the circuit width.
    #[error("{kind}: qubit {qubit} out of range for width {width}")]
    QubitOutOfRange {
        kind: Kind,
        qubit: usize,
        width: usize,
    },

    /// Classical bit index past the declared bit count.
    #[error("{kind}: classical bit {clbit} out of range for {num_clbits} bits")]
    ClbitOutOfRange {
        kind: Kind,
        clbit: usize,
        num_clbits: usize,
    },

    /// The same qubit appears twice in one instruction.
    #[error("{kind}: qubit {qubit} used more than once")]
    DuplicateOperand { kind: Kind, qubit: usize },

    /// Wrong number of qubit operands.
    #[error("{kind} acts on {expected} qubits, got {got}")]
    Arity {
        kind: Kind,
        expected: usize,
        got: usize,
    },

    /// Wrong number of angles.
    #[error("{kind} takes {expected} angles, got {got}")]
    ParamCount {
        kind: Kind,
        expected: usize,
        got: usize,
    },

    /// Angle is NaN or infinite.
    #[error("{kind}: non-finite angle {value}")]
    NonFiniteAngle { kind: Kind, value: f64 },

    /// Name outside the instruction vocabulary.
    #[error("Unknown instruction kind '{0}'")]
    UnknownKind(String),

    /// Name outside the simulation mode list.
    #[error("Unknown backend '{0}' (expected one of: statevector, tensornetwork, densitymatrix, mps)")]
    UnknownBackend(String),

    /// No executor is registered for the mode.
    #[error("No executor registered for backend '{0}'")]
    BackendUnavailable(Backend),

    /// Circuit too wide for the executor.
    #[error("Circuit needs {requested} qubits, executor supports at most {max}")]
    TooManyQubits { requested: usize, max: usize },

    /// Executor-specific failure.
    #[error("Execution failed: {0}")]
    Execution(String),
}

/// Result type for target-framework operations.
pub type PatternResult<T> = Result<T, PatternError>;
