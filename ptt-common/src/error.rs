//! Common error types for ParallelTimetables data conversion
//!
//! Every variant aborts the conversion run. Nothing is retried.

use crate::model::EntityKind;
use thiserror::Error;

/// Common result type for conversion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the converter and snapshot readers
#[derive(Error, Debug)]
pub enum Error {
    /// Lookup by original or generated id found nothing
    #[error("Not found: {kind} {id}")]
    NotFound { kind: EntityKind, id: String },

    /// Two entities of one kind share an original id
    #[error("Duplicate identifier: {kind} {id}")]
    DuplicateIdentifier { kind: EntityKind, id: String },

    /// Entity count outgrew the fixed-width identifier space of a kind
    #[error("Capacity exceeded: more than {limit} {kind} entities")]
    CapacityExceeded { kind: EntityKind, limit: usize },

    /// A builder or validator ran without the state it requires
    #[error("Malformed configuration: {0}")]
    MalformedConfiguration(String),

    /// Database operation error (wraps sqlx::Error); only with the `sqlx` feature
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot encoding or decoding error
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),

    /// Interchange document could not be written or parsed
    #[error("Interchange error: {0}")]
    Interchange(String),

    /// Configuration file loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        Error::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}
