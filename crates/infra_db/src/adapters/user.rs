//! PostgreSQL User Adapter
//!
//! Implements `UserPort` over `UserRepository`.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;

use core_kernel::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError, UserId,
};
use domain_identity::{User, UserPort};

use crate::repositories::user::{UserRepository, UserRow};

/// PostgreSQL-backed implementation of the UserPort trait
#[derive(Debug, Clone)]
pub struct PostgresUserAdapter {
    repository: UserRepository,
    pool: PgPool,
}

impl PostgresUserAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UserRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresUserAdapter {}

#[async_trait]
impl HealthCheckable for PostgresUserAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();
        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;
        let latency_ms = start.elapsed().as_millis() as u64;

        HealthCheckResult {
            adapter_id: "postgres-user-adapter".to_string(),
            status: if result.is_ok() {
                AdapterHealth::Healthy
            } else {
                AdapterHealth::Unhealthy
            },
            latency_ms,
            message: result.err().map(|e| format!("Database error: {}", e)),
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl UserPort for PostgresUserAdapter {
    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, PortError> {
        Ok(self.repository.find_by_email(email).await?.map(row_to_user))
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create_user(&self, user: User) -> Result<User, PortError> {
        let row = UserRow {
            id: user.id.into(),
            name: user.name,
            email: user.email,
            password: user.password_hash,
        };
        Ok(row_to_user(self.repository.insert(&row).await?))
    }
}

fn row_to_user(row: UserRow) -> User {
    User {
        id: UserId::from(row.id),
        name: row.name,
        email: row.email,
        password_hash: row.password,
    }
}
