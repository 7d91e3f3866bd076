use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanTrackerError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[cfg(feature = "store")]
impl LoanTrackerError {
    pub(crate) fn loan_not_found(id: &str) -> Self {
        LoanTrackerError::NotFound {
            entity: "Loan".into(),
            id: id.to_string(),
        }
    }

    pub(crate) fn payment_not_found(id: &str) -> Self {
        LoanTrackerError::NotFound {
            entity: "Payment".into(),
            id: id.to_string(),
        }
    }
}

impl From<serde_json::Error> for LoanTrackerError {
    fn from(e: serde_json::Error) -> Self {
        LoanTrackerError::SerializationError(e.to_string())
    }
}
