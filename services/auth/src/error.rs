//! Error types for the authentication crate

use common::StoreError;
use thiserror::Error;

/// Errors raised by the credential store, token service and guard
#[derive(Error, Debug)]
pub enum AuthError {
    /// Registration with a username that already exists
    #[error("Username {0} is already taken")]
    UsernameTaken(String),

    /// No user with the given id
    #[error("User with id {0} does not exist")]
    UserNotFound(u64),

    /// Token signature, format or expiry check failed
    #[error("Invalid token: {0}")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    /// Credentials or token did not resolve to an existing user
    #[error("Unauthorized")]
    Unauthorized,

    /// Input failed a presence or type check
    #[error("{0}")]
    Validation(String),

    /// The password hashing primitive failed
    #[error("Failed to hash password: {0}")]
    PasswordHash(String),

    /// The token signing primitive failed
    #[error("Failed to sign token: {0}")]
    TokenSigning(#[source] jsonwebtoken::errors::Error),

    /// The backing store rejected the operation
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Type alias for Result with AuthError
pub type AuthResult<T> = Result<T, AuthError>;
