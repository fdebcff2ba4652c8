//! PostgreSQL-backed user repository

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use tracing::{debug, info};

use super::{RepositoryError, UserRepository};
use crate::models::{UpdateUser, User, UserFilter};

/// Username uniqueness is checked by the service, not by an index here.
const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        user_id  TEXT PRIMARY KEY,
        username TEXT NOT NULL,
        password TEXT NOT NULL
    )
"#;

/// User repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `users` table if it does not exist yet
    pub async fn ensure_schema(&self) -> DatabaseResult<()> {
        info!("Ensuring users table exists");

        sqlx::query(CREATE_USERS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find(&self, filter: &UserFilter) -> Result<Vec<User>, RepositoryError> {
        debug!(?filter, "Finding users");

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, username, password
            FROM users
            WHERE ($1::TEXT IS NULL OR user_id = $1)
              AND ($2::TEXT IS NULL OR username = $2)
            "#,
        )
        .bind(filter.user_id.as_deref())
        .bind(filter.username.as_deref())
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn create(&self, user: User) -> Result<(), RepositoryError> {
        info!("Creating new user: {}", user.username);

        sqlx::query(
            r#"
            INSERT INTO users (user_id, username, password)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&user.user_id)
        .bind(&user.username)
        .bind(&user.password)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, user_id: &str, changes: &UpdateUser) -> Result<(), RepositoryError> {
        info!("Updating user: {}", user_id);

        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                password = COALESCE($3, password)
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(changes.username.as_deref())
        .bind(changes.password.as_deref())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<(), RepositoryError> {
        info!("Deleting user: {}", user_id);

        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
