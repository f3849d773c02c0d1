//! Identity Domain
//!
//! Users exist only to authenticate callers of the bill API:
//!
//! - [`User`]: a credential record (name, unique email, password hash)
//! - [`UserPort`]: the lookup/creation port implemented by `infra_db`
//! - [`password`]: argon2 hashing and constant-time verification
//!
//! ```rust,ignore
//! use domain_identity::{password, UserPort};
//!
//! let user = users.find_by_email("admin@example.com").await?;
//! let ok = user.map(|u| password::verify_password("secret", &u.password_hash)).transpose()?;
//! ```

pub mod user;
pub mod password;
pub mod ports;
pub mod error;

pub use user::{NewUser, User};
pub use ports::UserPort;
pub use error::IdentityError;
