//! Input validation for credentials and user identifiers
//!
//! Checks run in a fixed order: username presence, password presence, then
//! password length. Presence is checked first so an empty password reports
//! as missing rather than too short.

use uuid::Uuid;

use crate::error::AccountError;

/// Shortest accepted password, in bytes
pub const PASSWORD_MIN_LEN: usize = 6;
/// Longest accepted password, in bytes
pub const PASSWORD_MAX_LEN: usize = 16;

/// Validate a username/password pair
pub fn validate_credentials(username: &str, password: &str) -> Result<(), AccountError> {
    validate_username(username)?;
    validate_password(password)
}

/// Validate username
pub fn validate_username(username: &str) -> Result<(), AccountError> {
    if username.is_empty() {
        return Err(AccountError::UsernameMissing);
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), AccountError> {
    if password.is_empty() {
        return Err(AccountError::PasswordMissing);
    }

    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&password.len()) {
        return Err(AccountError::PasswordFormatInvalid);
    }

    Ok(())
}

/// Validate that a user id is a well-formed UUID
pub fn validate_user_id(user_id: &str) -> Result<Uuid, AccountError> {
    Uuid::parse_str(user_id).map_err(|_| AccountError::UserIdFormatInvalid)
}
