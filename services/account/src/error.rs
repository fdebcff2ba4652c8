//! Error types for the account service
//!
//! [`AccountError`] is what use cases return; its `Display` text is the
//! message sent back to clients for every client-caused failure.
//! Infrastructure failures collapse into [`AccountError::Unexpected`], whose
//! detail is only ever logged.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::jwt::TokenError;

/// Message rendered for any failure whose cause must not leak
pub const UNEXPECTED_MESSAGE: &str = "unexpected";

/// Closed set of error kinds; compare errors through this
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UsernameMissing,
    PasswordMissing,
    PasswordFormatInvalid,
    UsernameAlreadyExists,
    UsernameNotFound,
    Unauthorized,
    UserIdFormatInvalid,
    UserIdNotFound,
    Unexpected,
    Token,
}

/// Error returned by the account use cases
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("username not found")]
    UsernameMissing,

    #[error("password not found")]
    PasswordMissing,

    #[error("password must be between 6-16 characters")]
    PasswordFormatInvalid,

    #[error("username is exists")]
    UsernameAlreadyExists,

    #[error("username is not exists")]
    UsernameNotFound,

    #[error("unauthorized")]
    Unauthorized,

    #[error("user_id incorrect format")]
    UserIdFormatInvalid,

    #[error("user_id is not exists")]
    UserIdNotFound,

    /// Storage or infrastructure failure; the detail is for logs only
    #[error("unexpected")]
    Unexpected(String),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl AccountError {
    pub fn unexpected(detail: impl Into<String>) -> Self {
        Self::Unexpected(detail.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UsernameMissing => ErrorKind::UsernameMissing,
            Self::PasswordMissing => ErrorKind::PasswordMissing,
            Self::PasswordFormatInvalid => ErrorKind::PasswordFormatInvalid,
            Self::UsernameAlreadyExists => ErrorKind::UsernameAlreadyExists,
            Self::UsernameNotFound => ErrorKind::UsernameNotFound,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::UserIdFormatInvalid => ErrorKind::UserIdFormatInvalid,
            Self::UserIdNotFound => ErrorKind::UserIdNotFound,
            Self::Unexpected(_) => ErrorKind::Unexpected,
            Self::Token(_) => ErrorKind::Token,
        }
    }

    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::UsernameNotFound | ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Unexpected | ErrorKind::Token => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to hand back to the caller
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::Unexpected | ErrorKind::Token => UNEXPECTED_MESSAGE.to_string(),
            _ => self.to_string(),
        }
    }
}

impl PartialEq for AccountError {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind()
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }

        let body = Json(json!({
            "message": self.public_message(),
        }));

        (status, body).into_response()
    }
}

/// Type alias for account results
pub type AccountResult<T> = Result<T, AccountError>;
