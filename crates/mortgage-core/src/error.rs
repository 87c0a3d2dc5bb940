use thiserror::Error;

#[derive(Debug, Error)]
pub enum MortgageError {
    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Upstream unavailable: {service} — {reason}")]
    UpstreamUnavailable { service: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for MortgageError {
    fn from(e: serde_json::Error) -> Self {
        MortgageError::SerializationError(e.to_string())
    }
}
