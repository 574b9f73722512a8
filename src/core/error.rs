//! Error types for slot allocation and storage.

use thiserror::Error;

/// Errors produced by the allocation service and slot stores.
#[derive(Debug, Error)]
pub enum ParkingError {
    /// Malformed occupant name or booking token.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Every slot in the lot is occupied.
    #[error("no available slot")]
    NoAvailableSlot,
    /// No occupied slot carries the given booking token.
    #[error("booking not found: {0}")]
    BookingNotFound(String),
    /// Underlying persistence failure.
    #[error("storage error: {0}")]
    Storage(String),
    /// Persisted slot table does not match the configured lot capacity.
    #[error("capacity mismatch: configured {configured}, persisted {persisted}")]
    CapacityMismatch {
        /// Capacity requested at initialization.
        configured: u32,
        /// Number of slot rows already in the store.
        persisted: u32,
    },
    /// Failure inside the allocation machinery itself.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ParkingError {
    /// Whether the caller can fix the condition and retry (bad input, full lot, unknown token).
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::NoAvailableSlot | Self::BookingNotFound(_)
        )
    }
}

impl From<rusqlite::Error> for ParkingError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
