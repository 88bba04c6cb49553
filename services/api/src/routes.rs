//! API service routes

use auth::models::{LoginCredentials, NewUser};
use axum::{
    Extension, Form, Json, Router,
    extract::{Path, Query, State},
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use axum_extra::extract::WithRejection;
use serde_json::json;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    middleware::{CurrentUser, auth_middleware},
    models::{
        BookQuery, BookResponse, BookUpdate, DetailResponse, NewBook, TokenResponse, UserResponse,
    },
    negotiate::negotiate_response,
    state::AppState,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/v1/books", post(create_book))
        .route("/api/v1/books/:id", put(update_book).delete(delete_book))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/login", post(login))
        .route("/api/v1/users", get(get_users).post(register_user))
        .route("/api/v1/users/:id", delete(delete_user))
        .route("/api/v1/books", get(list_books))
        .route("/api/v1/books/:id", get(get_book))
        .merge(protected_routes)
        .layer(middleware::from_fn(negotiate_response))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "books-api"
    }))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Form(credentials), _): WithRejection<Form<LoginCredentials>, ApiError>,
) -> ApiResult<Json<TokenResponse>> {
    info!("Login attempt for user: {}", credentials.username);

    let user = state
        .authenticator
        .authenticate_credentials(&credentials.username, &credentials.password)
        .await
        .ok_or_else(|| ApiError::Unauthorized("Incorrect username or password".to_string()))?;

    let jwt = state.authenticator.jwt();
    let access_token = jwt.issue_access_token(&user.username)?;

    Ok(Json(TokenResponse::bearer(
        access_token,
        jwt.access_token_expiry(),
    )))
}

/// Get all users
pub async fn get_users(State(state): State<AppState>) -> Json<Vec<UserResponse>> {
    let users = state.user_repository.list().await;
    Json(users.iter().map(UserResponse::from).collect())
}

/// Register a new user
pub async fn register_user(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<NewUser>, ApiError>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.user_repository.create(&payload).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// Delete a user by ID
pub async fn delete_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<u64>, ApiError>,
) -> ApiResult<Json<DetailResponse>> {
    state.user_repository.delete(id).await?;
    Ok(Json(DetailResponse::new("User deleted!")))
}

/// List books, optionally searching title and description
pub async fn list_books(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<BookQuery>, ApiError>,
) -> ApiResult<Json<Vec<BookResponse>>> {
    let books = state.book_repository.list(query.q.as_deref()).await?;
    Ok(Json(books.iter().map(BookResponse::from).collect()))
}

/// Get a book by ID
pub async fn get_book(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<u64>, ApiError>,
) -> ApiResult<Json<BookResponse>> {
    let book = state.book_repository.get(id).await?;
    Ok(Json(BookResponse::from(&book)))
}

/// Publish a book as the authenticated user
pub async fn create_book(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    WithRejection(Json(payload), _): WithRejection<Json<NewBook>, ApiError>,
) -> ApiResult<Json<BookResponse>> {
    let book = state.book_repository.create(&payload, &user).await?;
    Ok(Json(BookResponse::from(&book)))
}

/// Update a book authored by the authenticated user
pub async fn update_book(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    WithRejection(Path(id), _): WithRejection<Path<u64>, ApiError>,
    WithRejection(Json(patch), _): WithRejection<Json<BookUpdate>, ApiError>,
) -> ApiResult<Json<BookResponse>> {
    let book = state.book_repository.update(id, &user, &patch).await?;
    Ok(Json(BookResponse::from(&book)))
}

/// Delete a book authored by the authenticated user
pub async fn delete_book(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    WithRejection(Path(id), _): WithRejection<Path<u64>, ApiError>,
) -> ApiResult<Json<DetailResponse>> {
    state.book_repository.delete(id, &user).await?;
    Ok(Json(DetailResponse::new("Book deleted!")))
}
