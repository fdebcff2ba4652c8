//! In-process user repository, used for local runs and tests

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{RepositoryError, UserRepository};
use crate::models::{UpdateUser, User, UserFilter};

#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-populated with `users`
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: Arc::new(RwLock::new(users.into_iter().collect())),
        }
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find(&self, filter: &UserFilter) -> Result<Vec<User>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.iter().filter(|u| filter.matches(u)).cloned().collect())
    }

    async fn create(&self, user: User) -> Result<(), RepositoryError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.user_id == user.user_id) {
            return Err(RepositoryError::Unavailable(format!(
                "duplicate user_id {}",
                user.user_id
            )));
        }
        users.push(user);
        Ok(())
    }

    async fn update(&self, user_id: &str, changes: &UpdateUser) -> Result<(), RepositoryError> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.user_id == user_id)
            .ok_or(RepositoryError::NotFound)?;

        changes.apply_to(user);
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<(), RepositoryError> {
        let mut users = self.users.write().await;
        let index = users
            .iter()
            .position(|u| u.user_id == user_id)
            .ok_or(RepositoryError::NotFound)?;

        users.remove(index);
        Ok(())
    }
}
