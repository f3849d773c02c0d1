//! Identity domain errors

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur in the identity domain
#[derive(Debug, Error)]
pub enum IdentityError {
    /// A user with this email already exists
    #[error("A user with email {0} already exists")]
    DuplicateEmail(String),

    /// User data failed validation
    #[error("Invalid user data: {0}")]
    InvalidData(String),

    /// The stored hash could not be parsed or produced
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// The user store failed
    #[error("Store error: {0}")]
    Store(#[from] PortError),
}

impl From<argon2::password_hash::Error> for IdentityError {
    fn from(error: argon2::password_hash::Error) -> Self {
        IdentityError::Hashing(error.to_string())
    }
}
