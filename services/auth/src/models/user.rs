//! User model and related payloads

use common::Record;
use serde::Deserialize;

/// User entity as held by the credential store
///
/// Never serialized directly; responses use a projection without the hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub password_hash: String,
    pub display_name: String,
}

impl Record for User {
    fn id(&self) -> u64 {
        self.id
    }
}

/// New user registration payload
#[derive(Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub display_name: String,
}

/// User login credentials, submitted as a form
#[derive(Clone, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}
