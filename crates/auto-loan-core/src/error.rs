use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AutoLoanError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Degenerate rate: monthly rate {monthly_rate} leaves the annuity formula undefined")]
    DegenerateRate { monthly_rate: Decimal },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for AutoLoanError {
    fn from(e: serde_json::Error) -> Self {
        AutoLoanError::SerializationError(e.to_string())
    }
}
