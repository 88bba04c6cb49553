//! Wookie Books API service
//!
//! HTTP endpoints for registering users, logging in and publishing books.
//! Mutating book endpoints require a bearer token, and every response is
//! rendered as JSON or XML depending on the request's `Accept` header.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod negotiate;
pub mod repositories;
pub mod routes;
pub mod seed;
pub mod state;
pub mod validation;

pub use routes::create_router;
pub use state::AppState;
