//! Application state shared across handlers

use auth::{Authenticator, JwtService, UserRepository};

use crate::repositories::BookRepository;

/// Application state shared across handlers
///
/// Every field is a cheap handle onto shared stores, so cloning the state
/// per request does not copy any records.
#[derive(Clone)]
pub struct AppState {
    pub user_repository: UserRepository,
    pub book_repository: BookRepository,
    pub authenticator: Authenticator,
}

impl AppState {
    pub fn new(
        jwt_service: JwtService,
        user_repository: UserRepository,
        book_repository: BookRepository,
    ) -> Self {
        let authenticator = Authenticator::new(jwt_service, user_repository.clone());
        Self {
            user_repository,
            book_repository,
            authenticator,
        }
    }
}
