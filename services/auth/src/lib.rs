//! Authentication for the Wookie Books service
//!
//! This crate holds the credential store, the bearer token service and the
//! guard that turns a presented token back into a registered user.

pub mod error;
pub mod guard;
pub mod jwt;
pub mod models;
pub mod repositories;
pub mod validation;

pub use error::{AuthError, AuthResult};
pub use guard::Authenticator;
pub use jwt::{JwtConfig, JwtService};
pub use repositories::UserRepository;
