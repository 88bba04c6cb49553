//! Authentication middleware for bearer token validation

use auth::models::User;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tracing::warn;

use crate::{error::ApiError, state::AppState};

/// The user resolved from the request's bearer token
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Authentication middleware
///
/// Resolves `Authorization: Bearer <token>` to a registered user and makes
/// it available to handlers as an [`CurrentUser`] extension.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let bearer = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or_else(|| {
            warn!("Request to {} without bearer token", req.uri().path());
            ApiError::Unauthorized("Not authenticated".to_string())
        })?;

    let user = state
        .authenticator
        .resolve_current_user(bearer.token())
        .await?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}
