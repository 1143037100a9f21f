//! Error types for benchmarking.

use thiserror::Error;

use qbridge_convert::ConvertError;
use qbridge_ir::IrError;
use qbridge_pattern::PatternError;

use crate::config::ConfigError;

/// Boxed failure of a measured operation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while configuring or running benchmarks.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BenchError {
    /// Rejected before any work started.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The measured operation failed on one trial.
    #[error("Trial {trial} failed: {source}")]
    OperationFailure { trial: usize, source: BoxError },

    #[error("Conversion failed: {0}")]
    Convert(#[from] ConvertError),

    #[error("Execution failed: {0}")]
    Execution(#[from] PatternError),

    /// The benchmark circuit could not be generated.
    #[error("Circuit generation failed: {0}")]
    Circuit(#[from] IrError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl BenchError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        BenchError::InvalidConfiguration(message.into())
    }
}

/// Result type for benchmark operations.
pub type BenchResult<T> = Result<T, BenchError>;
