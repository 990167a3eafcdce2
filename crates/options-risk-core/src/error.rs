use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum OptionsRiskError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("Degenerate margin: {variant} margin requirement is not positive, return on capital is not computable")]
    DegenerateMargin { variant: String },

    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for OptionsRiskError {
    fn from(e: serde_json::Error) -> Self {
        OptionsRiskError::SerializationError(e.to_string())
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
