//! Custom error types for the common library
//!
//! This module defines the errors raised by the record stores shared by
//! the services.

use thiserror::Error;

/// Custom error type for store operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No record with the given id exists
    #[error("Record {0} not found")]
    NotFound(u64),

    /// The id counter cannot advance any further
    #[error("Record id space exhausted")]
    IdsExhausted,
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;
