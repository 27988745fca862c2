//! Error types for walker evaluation.

use thiserror::Error;

use crate::evaluator::Mode;

/// Errors reported to the immediate caller of the evaluator.
#[derive(Debug, Error)]
pub enum WalkerError {
    /// Mode text is neither a derivative nor an impact selector.
    #[error("invalid mode {0:?}: expected \"derivative\" (\"s\") or \"impact\" (\"i\")")]
    InvalidMode(String),

    /// Formulation text is not a known derivative formulation.
    #[error("invalid formulation {0:?}: expected \"passive\" or \"actuated\"")]
    InvalidFormulation(String),

    /// A physical constant is missing, non-finite or breaks an invariant.
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameters { field: String, reason: String },

    /// A state component is not a finite real.
    #[error("invalid state component `{field}`: {value} is not finite")]
    InvalidState { field: String, value: f64 },

    /// The closed-form result hit a singularity of the equations.
    #[error("{mode} output is degenerate: {output:?}")]
    NumericDegenerate { mode: Mode, output: [f64; 4] },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WalkerError {
    pub(crate) fn invalid_parameter(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameters {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for walker operations.
pub type WalkerResult<T> = std::result::Result<T, WalkerError>;
