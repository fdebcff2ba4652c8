//! Account use cases: register, login, reset password and delete
//!
//! Every use case validates its input before touching storage, classifies
//! the first failure it meets and returns immediately. Repository calls are
//! bounded by a timeout; running out of time counts as a storage failure.

use std::{future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    error::{AccountError, AccountResult},
    jwt::JwtService,
    models::{UpdateUser, User, UserFilter},
    repositories::{RepositoryError, UserRepository},
    validation::{validate_credentials, validate_password, validate_user_id},
};

/// Default bound on a single repository call
pub const DEFAULT_REPOSITORY_TIMEOUT: Duration = Duration::from_secs(5);

/// Account operations exposed to the transport layer
#[async_trait]
pub trait AccountService: Send + Sync {
    async fn register(&self, username: &str, password: &str) -> AccountResult<()>;

    /// Returns a signed token on success
    async fn login(&self, username: &str, password: &str) -> AccountResult<String>;

    async fn reset_password(&self, user_id: &str, new_password: &str) -> AccountResult<()>;

    async fn delete_user(&self, user_id: &str) -> AccountResult<()>;
}

/// [`AccountService`] backed by a [`UserRepository`]
pub struct UserAccountService<R: ?Sized> {
    repository: Arc<R>,
    jwt_service: JwtService,
    repository_timeout: Duration,
}

impl<R> UserAccountService<R>
where
    R: UserRepository + ?Sized,
{
    pub fn new(repository: Arc<R>, jwt_service: JwtService) -> Self {
        Self {
            repository,
            jwt_service,
            repository_timeout: DEFAULT_REPOSITORY_TIMEOUT,
        }
    }

    pub fn with_repository_timeout(mut self, timeout: Duration) -> Self {
        self.repository_timeout = timeout;
        self
    }

    /// Run a repository call under the configured timeout
    async fn bounded<T, F>(&self, operation: &'static str, call: F) -> Result<T, RepositoryError>
    where
        F: Future<Output = Result<T, RepositoryError>>,
    {
        match tokio::time::timeout(self.repository_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "Repository {} timed out after {:?}",
                    operation, self.repository_timeout
                );
                Err(RepositoryError::Unavailable(format!(
                    "{} timed out after {:?}",
                    operation, self.repository_timeout
                )))
            }
        }
    }

    async fn find_by_username(&self, username: &str) -> AccountResult<Vec<User>> {
        self.bounded("find", self.repository.find(&UserFilter::by_username(username)))
            .await
            .map_err(|e| {
                error!("Failed to look up user {}: {}", username, e);
                AccountError::unexpected(e.to_string())
            })
    }
}

/// Map update/delete failures, keeping "no such user" distinct
fn classify_write_error(user_id: &str, error: RepositoryError) -> AccountError {
    match error {
        RepositoryError::NotFound => AccountError::UserIdNotFound,
        other => {
            error!("Repository write for user {} failed: {}", user_id, other);
            AccountError::unexpected(other.to_string())
        }
    }
}

#[async_trait]
impl<R> AccountService for UserAccountService<R>
where
    R: UserRepository + ?Sized,
{
    #[tracing::instrument(name = "AccountService::register", skip(self, password))]
    async fn register(&self, username: &str, password: &str) -> AccountResult<()> {
        validate_credentials(username, password)?;

        // Not atomic with the insert below; concurrent registrations can race.
        let existing = self.find_by_username(username).await?;
        if !existing.is_empty() {
            return Err(AccountError::UsernameAlreadyExists);
        }

        let user = User::new(Uuid::new_v4().to_string(), username, password);
        let user_id = user.user_id.clone();

        self.bounded("create", self.repository.create(user))
            .await
            .map_err(|e| {
                error!("Failed to create user {}: {}", username, e);
                AccountError::unexpected(e.to_string())
            })?;

        info!("Registered user {} ({})", username, user_id);
        Ok(())
    }

    #[tracing::instrument(name = "AccountService::login", skip(self, password))]
    async fn login(&self, username: &str, password: &str) -> AccountResult<String> {
        validate_credentials(username, password)?;

        let users = self.find_by_username(username).await?;
        let user = users.first().ok_or(AccountError::UsernameNotFound)?;

        if user.password != password {
            info!("Rejected login for user {}", username);
            return Err(AccountError::Unauthorized);
        }

        let token = self.jwt_service.issue(&user.user_id, &user.username)?;

        info!("User {} logged in", username);
        Ok(token)
    }

    #[tracing::instrument(name = "AccountService::reset_password", skip(self, new_password))]
    async fn reset_password(&self, user_id: &str, new_password: &str) -> AccountResult<()> {
        validate_password(new_password)?;
        validate_user_id(user_id)?;

        self.bounded(
            "update",
            self.repository
                .update(user_id, &UpdateUser::password(new_password)),
        )
        .await
        .map_err(|e| classify_write_error(user_id, e))?;

        info!("Password reset for user {}", user_id);
        Ok(())
    }

    #[tracing::instrument(name = "AccountService::delete_user", skip(self))]
    async fn delete_user(&self, user_id: &str) -> AccountResult<()> {
        validate_user_id(user_id)?;

        self.bounded("delete", self.repository.delete(user_id))
            .await
            .map_err(|e| classify_write_error(user_id, e))?;

        info!("Deleted user {}", user_id);
        Ok(())
    }
}
