//! User repository implementation

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Repository for `payment.users`
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Finds a user by email, ignoring case
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserRow>, DatabaseError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password FROM payment.users WHERE lower(email) = lower($1)",
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Inserts a user
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::DuplicateEntry` when the email is taken
    pub async fn insert(&self, user: &UserRow) -> Result<UserRow, DatabaseError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO payment.users (id, name, email, password) VALUES ($1, $2, $3, $4) \
             RETURNING id, name, email, password",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}

/// Database row for a user; `password` holds the argon2 PHC string
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
}
