//! User repository: the credential store

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use common::{MemoryStore, Store};
use tracing::{info, warn};

use crate::{
    error::{AuthError, AuthResult},
    models::{NewUser, User},
    validation::validate_new_user,
};

/// User repository
#[derive(Clone)]
pub struct UserRepository<S = MemoryStore<User>> {
    store: S,
}

impl UserRepository {
    /// Create a repository over an empty in-memory store
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }
}

impl<S: Store<User>> UserRepository<S> {
    /// Create a new user repository
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create a new user
    ///
    /// The password is hashed before the store lock is taken; the username
    /// uniqueness check and the insert happen under the lock.
    pub async fn create(&self, new_user: &NewUser) -> AuthResult<User> {
        info!("Creating new user: {}", new_user.username);

        validate_new_user(new_user)?;

        if self.exists(&new_user.username).await {
            return Err(AuthError::UsernameTaken(new_user.username.clone()));
        }

        let password_hash = hash_password(&new_user.password)?;
        let username = new_user.username.clone();
        let display_name = new_user.display_name.clone();

        let user = self
            .store
            .insert(move |id, existing: &[User]| {
                if existing.iter().any(|u| u.username == username) {
                    return Err(AuthError::UsernameTaken(username));
                }
                Ok(User {
                    id,
                    username,
                    password_hash,
                    display_name,
                })
            })
            .await?;

        info!("Created user {} with id {}", user.username, user.id);
        Ok(user)
    }

    /// Register every user in `users`, stopping at the first failure
    pub async fn seed(&self, users: &[NewUser]) -> AuthResult<()> {
        for new_user in users {
            self.create(new_user).await?;
        }
        Ok(())
    }

    /// Find a user by username (exact, case-sensitive match)
    pub async fn find_by_username(&self, username: &str) -> Option<User> {
        self.store.find(|u| u.username == username).await
    }

    /// Check whether a username is registered
    pub async fn exists(&self, username: &str) -> bool {
        self.find_by_username(username).await.is_some()
    }

    /// Get all users, in registration order
    pub async fn list(&self) -> Vec<User> {
        self.store.list().await
    }

    /// Delete a user by ID
    pub async fn delete(&self, id: u64) -> AuthResult<User> {
        let removed = self
            .store
            .remove(id, |_| Ok::<_, AuthError>(()))
            .await?
            .ok_or(AuthError::UserNotFound(id))?;

        info!("Deleted user {} with id {}", removed.username, removed.id);
        Ok(removed)
    }

    /// Verify a user's password
    pub fn verify_password(&self, user: &User, password: &str) -> bool {
        let parsed_hash = match PasswordHash::new(&user.password_hash) {
            Ok(hash) => hash,
            Err(e) => {
                warn!("Stored password hash for {} is unreadable: {}", user.username, e);
                return false;
            }
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?
        .to_string();
    Ok(password_hash)
}
