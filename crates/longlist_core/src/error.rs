//! Application error types for core domain logic.
use thiserror::Error;

/// Top-level application error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Unknown item id: {0}")]
    UnknownId(u64),

    #[error("Duplicate item id in reorder: {0}")]
    DuplicateId(u64),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Storage error: {0}")]
    StorageMessage(String),
}

impl AppError {
    /// Whether the error was caused by invalid caller input (as opposed to a
    /// failure inside the store).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownId(_) | Self::DuplicateId(_) | Self::BadRequest(_)
        )
    }
}
