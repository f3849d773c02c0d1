//! User credential records

use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use core_kernel::UserId;

use crate::error::IdentityError;
use crate::password;

/// A persisted user
///
/// The password is only ever held as an argon2 PHC string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl User {
    /// Checks a plain-text password against the stored hash
    pub fn verify_password(&self, candidate: &str) -> Result<bool, IdentityError> {
        password::verify_password(candidate, &self.password_hash)
    }
}

/// Data for registering a user
#[derive(Debug, Clone, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Validates the data and hashes the password
    ///
    /// The email is stored lowercased so lookups are case-insensitive.
    pub fn into_user(self, id: UserId) -> Result<User, IdentityError> {
        self.validate()
            .map_err(|e| IdentityError::InvalidData(e.to_string()))?;

        debug!(user_id = %id, "Hashing password for new user");
        Ok(User {
            id,
            name: self.name.trim().to_string(),
            email: normalize_email(&self.email),
            password_hash: password::hash_password(&self.password)?,
        })
    }
}

/// Canonical form of an email used as the lookup key
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
