//! User repository port and its storage adapters

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{UpdateUser, User, UserFilter};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;

/// Repository errors
///
/// `NotFound` is reported by `update` and `delete` only, so callers can tell
/// an absent user apart from a storage failure.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("user not found")]
    NotFound,

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence port for user records
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Users matching every populated field of `filter`; an empty filter returns all users
    async fn find(&self, filter: &UserFilter) -> Result<Vec<User>, RepositoryError>;

    async fn create(&self, user: User) -> Result<(), RepositoryError>;

    /// Apply a partial update to the user with `user_id`
    async fn update(&self, user_id: &str, changes: &UpdateUser) -> Result<(), RepositoryError>;

    async fn delete(&self, user_id: &str) -> Result<(), RepositoryError>;
}
