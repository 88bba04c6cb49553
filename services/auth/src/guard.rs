//! Authentication guard
//!
//! Resolves login credentials or a bearer token to a registered user. Every
//! failure collapses into the same outcome so callers cannot tell an unknown
//! user from a wrong password, or a forged token from a deleted account.

use common::{MemoryStore, Store};
use tracing::{info, warn};

use crate::{
    error::{AuthError, AuthResult},
    jwt::JwtService,
    models::User,
    repositories::UserRepository,
};

/// Authentication guard over the token service and the credential store
#[derive(Clone)]
pub struct Authenticator<S = MemoryStore<User>> {
    jwt: JwtService,
    users: UserRepository<S>,
}

impl<S: Store<User>> Authenticator<S> {
    /// Create a new guard
    pub fn new(jwt: JwtService, users: UserRepository<S>) -> Self {
        Self { jwt, users }
    }

    /// Check a username and raw password
    ///
    /// Returns `None` for an unknown user and for a wrong password alike.
    pub async fn authenticate_credentials(&self, username: &str, password: &str) -> Option<User> {
        let user = self.users.find_by_username(username).await;

        match user {
            Some(user) if self.users.verify_password(&user, password) => {
                info!("User {} authenticated", user.username);
                Some(user)
            }
            _ => {
                warn!("Failed login attempt for user: {}", username);
                None
            }
        }
    }

    /// Resolve a bearer token to the user it was issued for
    ///
    /// Fails closed: an invalid or expired token, or one whose subject no
    /// longer exists in the credential store, is `Unauthorized`.
    pub async fn resolve_current_user(&self, token: &str) -> AuthResult<User> {
        let username = self.jwt.verify(token).map_err(|e| {
            warn!("Rejected bearer token: {}", e);
            AuthError::Unauthorized
        })?;

        self.users.find_by_username(&username).await.ok_or_else(|| {
            warn!("Bearer token subject {} is no longer registered", username);
            AuthError::Unauthorized
        })
    }

    /// The token service used by this guard
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{jwt::JwtConfig, models::NewUser};
    use std::time::Duration;

    fn guard() -> Authenticator {
        let jwt = JwtService::new(JwtConfig {
            secret: "guard-secret".to_string(),
            access_token_expiry: 60,
        });
        Authenticator::new(jwt, UserRepository::in_memory())
    }

    async fn register(guard: &Authenticator, username: &str) -> User {
        guard
            .users
            .create(&NewUser {
                username: username.to_string(),
                password: "123abc".to_string(),
                display_name: "darknight".to_string(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_credentials_resolve_registered_user() {
        let guard = guard();
        let batman = register(&guard, "Batman").await;

        let user = guard.authenticate_credentials("Batman", "123abc").await;
        assert_eq!(user, Some(batman));
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_look_the_same() {
        let guard = guard();
        register(&guard, "Batman").await;

        assert_eq!(guard.authenticate_credentials("Batman", "nope").await, None);
        assert_eq!(guard.authenticate_credentials("Joker", "123abc").await, None);
    }

    #[tokio::test]
    async fn test_token_resolves_to_exactly_its_user() {
        let guard = guard();
        register(&guard, "Bobby").await;
        let batman = register(&guard, "Batman").await;

        let token = guard.jwt().issue_access_token("Batman").unwrap();
        assert_eq!(guard.resolve_current_user(&token).await.unwrap(), batman);
    }

    #[tokio::test]
    async fn test_token_of_deleted_user_is_unauthorized() {
        let guard = guard();
        let batman = register(&guard, "Batman").await;
        let token = guard.jwt().issue_access_token("Batman").unwrap();

        guard.users.delete(batman.id).await.unwrap();

        assert!(matches!(
            guard.resolve_current_user(&token).await,
            Err(AuthError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_expired_token_is_unauthorized() {
        let guard = guard();
        register(&guard, "Batman").await;
        let token = guard.jwt().issue("Batman", Duration::from_secs(1)).unwrap();

        assert!(guard.resolve_current_user(&token).await.is_ok());
        tokio::time::sleep(Duration::from_millis(2100)).await;

        assert!(matches!(
            guard.resolve_current_user(&token).await,
            Err(AuthError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_garbage_token_is_unauthorized() {
        let guard = guard();
        assert!(matches!(
            guard.resolve_current_user("garbage").await,
            Err(AuthError::Unauthorized)
        ));
    }
}
