//! User model and related functionality

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User entity as persisted in the `users` collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: String,
    pub username: String,
    pub password: String,
}

impl User {
    pub fn new(
        user_id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Sparse lookup filter; `None` fields match every record
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserFilter {
    pub user_id: Option<String>,
    pub username: Option<String>,
}

impl UserFilter {
    /// Filter matching every user
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Self::default()
        }
    }

    pub fn by_user_id(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    /// Whether `user` satisfies every populated field of the filter
    pub fn matches(&self, user: &User) -> bool {
        self.user_id.as_deref().is_none_or(|id| id == user.user_id)
            && self
                .username
                .as_deref()
                .is_none_or(|name| name == user.username)
    }
}

/// Partial user update; only `Some` fields are written
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl UpdateUser {
    pub fn password(password: impl Into<String>) -> Self {
        Self {
            password: Some(password.into()),
            ..Self::default()
        }
    }

    /// Apply the populated fields onto `user`
    pub fn apply_to(&self, user: &mut User) {
        if let Some(username) = &self.username {
            user.username = username.clone();
        }
        if let Some(password) = &self.password {
            user.password = password.clone();
        }
    }
}
