use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShareValError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Financial impossibility: {0}")]
    FinancialImpossibility(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl ShareValError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ShareValError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// A figure left the range a 96-bit decimal can hold.
    pub(crate) fn overflow(what: &str) -> Self {
        ShareValError::FinancialImpossibility(format!("{what} exceeds the representable decimal range"))
    }
}

impl From<serde_json::Error> for ShareValError {
    fn from(e: serde_json::Error) -> Self {
        ShareValError::SerializationError(e.to_string())
    }
}

#[cfg(feature = "tabular")]
impl From<csv::Error> for ShareValError {
    fn from(e: csv::Error) -> Self {
        ShareValError::SerializationError(e.to_string())
    }
}
