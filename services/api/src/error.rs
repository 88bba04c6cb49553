//! Custom error types for the API service

use auth::AuthError;
use axum::{
    Json,
    extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
    http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::{models::DetailResponse, repositories::BookError};

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing, invalid or expired credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Authenticated but not allowed
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            ApiError::Unauthorized(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError => "Internal server error".to_string(),
        };

        let mut response = (status, Json(DetailResponse::new(detail))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::UsernameTaken(_) => ApiError::BadRequest("Username taken".to_string()),
            AuthError::UserNotFound(id) => {
                ApiError::NotFound(format!("User with id: {id} does not exist"))
            }
            AuthError::InvalidToken(_) | AuthError::Unauthorized => {
                ApiError::Unauthorized("Could not validate credentials".to_string())
            }
            AuthError::Validation(msg) => ApiError::BadRequest(msg),
            err @ (AuthError::PasswordHash(_)
            | AuthError::TokenSigning(_)
            | AuthError::Store(_)) => {
                error!("Authentication failure: {}", err);
                ApiError::InternalServerError
            }
        }
    }
}

impl From<BookError> for ApiError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::NotFound(_) => ApiError::NotFound("Book not found".to_string()),
            BookError::NoMatches(q) => {
                ApiError::NotFound(format!("No books found with the word {q}"))
            }
            BookError::BlockedAuthor(username) => ApiError::Forbidden(format!(
                "{username} is not allowed to publish on Wookie Books"
            )),
            BookError::NotAuthor { .. } => ApiError::Forbidden("Forbidden! Not your book.".to_string()),
            BookError::Validation(msg) => ApiError::BadRequest(msg),
            BookError::Store(e) => {
                error!("Book store failure: {}", e);
                ApiError::InternalServerError
            }
        }
    }
}

// Extractor rejections become 400s so they carry a detail body like any other error.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
