use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompsError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CompsError {
    fn from(e: serde_json::Error) -> Self {
        CompsError::SerializationError(e.to_string())
    }
}
