use thiserror::Error;

use tickvault_core::ValidationError;

/// Failure while reconstructing typed records from a query result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("column '{column}' missing from query result")]
    MissingColumn { column: String },
    #[error("column '{column}' value '{value}' is not a number")]
    InvalidNumber { column: String, value: String },
    #[error("column '{column}' value '{value}' is not an RFC3339 timestamp")]
    InvalidTimestamp { column: String, value: String },
}

/// Top-level error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database unreachable. Not recovered locally; surfaced to the caller.
    #[error("database unreachable: {0}")]
    Connection(String),

    /// Write rejected by the database. The overview is left untouched.
    #[error("write rejected (status {status}): {message}")]
    Write { status: u16, message: String },

    #[error("query failed: {0}")]
    Query(String),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// A write batch mixed records from different series.
    #[error("batch mixes series: expected {expected}, found {found}")]
    InvalidBatch { expected: String, found: String },

    #[error("write batch must not be empty")]
    EmptyBatch,

    /// Overview index persistence failure.
    #[error("overview store: {0}")]
    Overview(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
