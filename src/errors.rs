use thiserror::Error;

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// User input rejected before any ledger mutation takes place.
///
/// The display strings are meant to be shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid positive amount.")]
    InvalidAmount,
    #[error("Please choose a category.")]
    UnknownCategory,
    #[error("Please choose a valid date.")]
    InvalidDate,
    #[error("Date cannot be in the future.")]
    FutureDate,
    #[error("Please enter a valid budget amount.")]
    InvalidBudget,
}
