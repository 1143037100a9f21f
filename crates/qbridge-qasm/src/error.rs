//! Error types for the OpenQASM reader.

use thiserror::Error;

/// Errors that can occur while reading OpenQASM text.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Lexer error (invalid token).
    #[error("Lexer error at line {line}: {message}")]
    LexerError { line: usize, message: String },

    /// Unexpected token.
    #[error("Unexpected token at line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: String,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input: {0}")]
    UnexpectedEof(String),

    /// Invalid version.
    #[error("Invalid OPENQASM version: {0}")]
    InvalidVersion(String),

    /// Register used before it was declared.
    #[error("Undefined register '{name}' at line {line}")]
    UndefinedRegister { line: usize, name: String },

    /// Wrong number of qubit operands.
    #[error("Gate '{gate}' expects {expected} qubits, got {got}")]
    WrongQubitCount {
        gate: String,
        expected: usize,
        got: usize,
    },

    /// Wrong number of parameters.
    #[error("Gate '{gate}' expects {expected} parameters, got {got}")]
    WrongParameterCount {
        gate: String,
        expected: usize,
        got: usize,
    },

    /// Broadcast over registers of different sizes.
    #[error("Register size mismatch at line {line}: {message}")]
    SizeMismatch { line: usize, message: String },

    /// Expression cannot be evaluated to a constant.
    #[error("Cannot evaluate expression at line {line}: {expression}")]
    InvalidExpression { line: usize, expression: String },

    /// Syntax outside the supported subset.
    #[error("Unsupported statement at line {line}: {what}")]
    Unsupported { line: usize, what: String },

    /// Literal out of the representable range.
    #[error("Literal {0} is too large")]
    LiteralOverflow(u64),

    /// IR error during circuit construction.
    #[error("Circuit error: {0}")]
    CircuitError(#[from] qbridge_ir::IrError),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
