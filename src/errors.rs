use thiserror::Error;

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid amount: {0} (amounts must be positive and finite)")]
    InvalidAmount(f64),
    #[error("Unknown transaction type `{0}`")]
    UnknownTransactionType(String),
    #[error("Unknown payoff strategy `{0}`")]
    UnknownStrategy(String),
    #[error("Unknown frequency `{0}`")]
    UnknownFrequency(String),
    #[error("Invalid reference: {0}")]
    InvalidRef(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Rejects amounts that would silently corrupt balances.
pub fn ensure_positive_amount(amount: f64) -> Result<f64, LedgerError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(LedgerError::InvalidAmount(amount))
    }
}
