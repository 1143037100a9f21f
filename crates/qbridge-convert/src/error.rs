//! Error types for the conversion crate.

use thiserror::Error;

/// Errors that can occur during conversion.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// An instruction has no expression in the canonical gate set.
    #[error("Unsupported instruction '{kind}': no decomposition into the canonical gate set")]
    UnsupportedInstruction { kind: String },

    /// The exchange document did not read back into the target vocabulary.
    #[error("Malformed exchange document: {reason}")]
    MalformedExchangeDocument { reason: String },

    /// The decomposer broke its contract.
    #[error("Decomposition failed: {0}")]
    Decomposition(String),

    /// Alias table rejected at construction.
    #[error("Invalid gate set: {0}")]
    InvalidGateSet(String),

    /// Error from the IR crate.
    #[error("IR error: {0}")]
    Ir(#[from] qbridge_ir::IrError),

    /// Error from the target framework.
    #[error("Target error: {0}")]
    Pattern(#[from] qbridge_pattern::PatternError),
}

impl ConvertError {
    pub(crate) fn unsupported(kind: impl Into<String>) -> Self {
        ConvertError::UnsupportedInstruction { kind: kind.into() }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        ConvertError::MalformedExchangeDocument {
            reason: reason.into(),
        }
    }
}

/// Result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;
