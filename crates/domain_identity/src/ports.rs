//! Identity Domain Ports
//!
//! `UserPort` is the credential lookup used by login and by the bearer token
//! filter. The Postgres implementation lives in `infra_db`.

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, PortError};

use crate::user::User;

/// Port for user lookup and registration
#[async_trait]
pub trait UserPort: DomainPort + HealthCheckable {
    /// Finds a user by email, compared case-insensitively
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, PortError>;

    /// Stores a user whose password is already hashed
    ///
    /// # Returns
    ///
    /// `PortError::Conflict` when the email is taken
    async fn create_user(&self, user: User) -> Result<User, PortError>;
}

/// In-memory implementation of UserPort for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use crate::user::normalize_email;

    /// In-memory user store keyed by normalized email
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryUserPort {
        users: Arc<RwLock<HashMap<String, User>>>,
    }

    impl InMemoryUserPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with users for testing
        pub async fn with_users(users: Vec<User>) -> Self {
            let port = Self::new();
            for user in users {
                port.users
                    .write()
                    .await
                    .insert(normalize_email(&user.email), user);
            }
            port
        }
    }

    impl DomainPort for InMemoryUserPort {}

    #[async_trait]
    impl HealthCheckable for InMemoryUserPort {
        async fn health_check(&self) -> core_kernel::HealthCheckResult {
            core_kernel::HealthCheckResult {
                adapter_id: "in-memory-user-port".to_string(),
                status: core_kernel::AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("In-memory adapter always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl UserPort for InMemoryUserPort {
        async fn find_by_email(&self, email: &str) -> Result<Option<User>, PortError> {
            Ok(self.users.read().await.get(&normalize_email(email)).cloned())
        }

        async fn create_user(&self, user: User) -> Result<User, PortError> {
            let key = normalize_email(&user.email);
            let mut users = self.users.write().await;
            if users.contains_key(&key) {
                return Err(PortError::conflict(format!("email {key} already registered")));
            }
            users.insert(key, user.clone());
            Ok(user)
        }
    }
}
