//! Domain service for accounts and the login session.
//!
//! Handles registration, login/logout, and resolving who is acting.

use std::collections::HashMap;

use thiserror::Error;

use crate::db::CorruptDocument;
use crate::domain::{Actor, UserId};
use crate::models::{NewUser, User, UserSummary};

/// Errors specific to identity operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Already taken: {0}")]
    Conflict(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Corrupt data: {0}")]
    CorruptData(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<CorruptDocument>() {
            Some(corrupt) => Self::CorruptData(corrupt.to_string()),
            None => Self::Storage(format!("{err:#}")),
        }
    }
}

/// What the request core needs to know about users.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The logged-in actor, if any.
    async fn current_actor(&self) -> Result<Option<Actor>, AuthError>;

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<UserSummary>, AuthError>;

    /// Every known user keyed by id, for joining owners onto request lists.
    async fn user_directory(&self) -> Result<HashMap<UserId, UserSummary>, AuthError>;
}

/// Domain service trait for accounts.
#[async_trait::async_trait]
pub trait IdentityService: IdentityProvider {
    /// Creates a regular user account.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Validation`] listing every invalid field
    /// - [`AuthError::Conflict`] if the login or email is already registered
    async fn register(&self, input: NewUser) -> Result<User, AuthError>;

    /// Verifies credentials and opens a session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if no user matches.
    async fn login(&self, login: &str, password: &str) -> Result<User, AuthError>;

    /// Closes the session. Returns `false` if nobody was logged in.
    async fn logout(&self) -> Result<bool, AuthError>;

    async fn current_user(&self) -> Result<Option<User>, AuthError>;

    /// All accounts, without credentials.
    async fn list_users(&self) -> Result<Vec<User>, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_documents_map_to_corrupt_data() {
        let err: anyhow::Error = CorruptDocument::new("softbuy_users", "not an array").into();
        assert!(matches!(AuthError::from(err), AuthError::CorruptData(_)));
    }

    #[test]
    fn database_errors_map_to_storage() {
        let err = AuthError::from(sea_orm::DbErr::Custom("locked".to_string()));
        assert!(matches!(err, AuthError::Storage(msg) if msg.contains("locked")));
    }
}
