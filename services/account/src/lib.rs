//! User account service
//!
//! Registration, login, password reset and deletion of user accounts over
//! HTTP. The use cases live in [`service`]; storage sits behind the
//! [`repositories::UserRepository`] port and tokens are issued by
//! [`jwt::JwtService`].

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod jwt;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod service;
pub mod validation;

use crate::service::AccountService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<dyn AccountService>,
}

impl AppState {
    pub fn new(account_service: Arc<dyn AccountService>) -> Self {
        Self { account_service }
    }
}
