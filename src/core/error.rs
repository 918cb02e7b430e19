use mongodb::error::{ErrorKind, WriteFailure};

/// Crate-wide Result type
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by repository construction and operations.
///
/// Absence of a matching document is never an error; it is reported as
/// `None`, an empty cursor, or a completed no-op.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// Construction-time configuration problems: a blank collection
    /// declaration, a blank or malformed connection string, an unreachable
    /// server. Never retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A malformed document id string supplied by a caller. Reported before
    /// any I/O and distinct from "not found".
    #[error("Invalid document id '{id}': {source}")]
    InvalidId {
        id: String,
        #[source]
        source: bson::oid::Error,
    },

    /// Errors propagated unchanged from the MongoDB driver.
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

impl StoreError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        StoreError::Configuration(msg.into())
    }

    /// True when the underlying driver error is a duplicate-key write
    /// conflict, in either a single write or a batch insert.
    pub fn is_duplicate_key(&self) -> bool {
        const DUPLICATE_KEY: i32 = 11000;

        let StoreError::Database(error) = self else {
            return false;
        };

        match error.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
                write_error.code == DUPLICATE_KEY
            }
            ErrorKind::InsertMany(failure) => failure
                .write_errors
                .as_ref()
                .is_some_and(|errors| errors.iter().any(|e| e.code == DUPLICATE_KEY)),
            _ => false,
        }
    }
}
