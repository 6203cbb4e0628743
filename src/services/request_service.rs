//! Domain service for support requests.
//!
//! Ties together the request store, the lifecycle rules, and the query
//! engine. Every operation takes the acting identity explicitly; a missing
//! actor is reported as [`RequestError::AuthRequired`].

use crate::db::CorruptDocument;
use crate::domain::{Actor, RequestId};
use crate::models::{Category, Request, RequestStatus};
use crate::services::identity_service::AuthError;
use crate::services::query::{RequestPage, RequestQuery, RequestStats, RequestView};
use thiserror::Error;

/// Domain errors for request operations.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Authentication required")]
    AuthRequired,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Request not found: {0}")]
    NotFound(RequestId),

    #[error("Request {id} is {status}; only new requests can be withdrawn")]
    InvalidState { id: RequestId, status: RequestStatus },

    #[error("Request {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: RequestId,
        from: RequestStatus,
        to: RequestStatus,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Corrupt data: {0}")]
    CorruptData(String),
}

impl From<sea_orm::DbErr> for RequestError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<CorruptDocument> for RequestError {
    fn from(err: CorruptDocument) -> Self {
        Self::CorruptData(err.to_string())
    }
}

impl From<anyhow::Error> for RequestError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<CorruptDocument>() {
            Some(corrupt) => Self::CorruptData(corrupt.to_string()),
            None => Self::Storage(format!("{err:#}")),
        }
    }
}

impl From<AuthError> for RequestError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::CorruptData(msg) => Self::CorruptData(msg),
            other => Self::Storage(other.to_string()),
        }
    }
}

/// Input for filing a new request.
///
/// `category` is optional only so that a missing selection can be reported
/// as a validation failure alongside empty text fields.
#[derive(Debug, Clone, Default)]
pub struct NewRequest {
    pub title: String,
    pub description: String,
    pub category: Option<Category>,
}

/// Domain service trait for support requests.
#[async_trait::async_trait]
pub trait RequestService: Send + Sync {
    /// Files a new request owned by `actor`.
    ///
    /// # Errors
    ///
    /// - [`RequestError::Validation`] if title, description or category is missing
    /// - [`RequestError::AuthRequired`] if there is no actor
    async fn create_request(
        &self,
        actor: Option<&Actor>,
        request: NewRequest,
    ) -> Result<Request, RequestError>;

    /// Fetches one request visible to `actor`, enriched with its owner for admins.
    ///
    /// Requests owned by someone else are reported as not found to a regular user.
    async fn get_request(
        &self,
        actor: Option<&Actor>,
        id: RequestId,
    ) -> Result<RequestView, RequestError>;

    /// Runs the filter/sort/paginate pipeline over the actor's scope.
    async fn list_requests(
        &self,
        actor: Option<&Actor>,
        query: &RequestQuery,
    ) -> Result<RequestPage, RequestError>;

    /// Marks a new request as solved. Admin only.
    ///
    /// # Errors
    ///
    /// - [`RequestError::Forbidden`] for non-admin actors
    /// - [`RequestError::NotFound`] if the id is unknown
    /// - [`RequestError::InvalidTransition`] if the request is already solved or rejected
    async fn solve(&self, actor: Option<&Actor>, id: RequestId) -> Result<Request, RequestError>;

    /// Rejects a new request with a reason. Admin only.
    ///
    /// # Errors
    ///
    /// Same as [`RequestService::solve`], plus [`RequestError::Validation`] for a blank reason.
    async fn reject(
        &self,
        actor: Option<&Actor>,
        id: RequestId,
        reason: &str,
    ) -> Result<Request, RequestError>;

    /// Withdraws a request on behalf of its owner.
    ///
    /// # Errors
    ///
    /// - [`RequestError::Forbidden`] if the actor does not own the request
    /// - [`RequestError::InvalidState`] if the request is no longer new
    async fn delete_own(&self, actor: Option<&Actor>, id: RequestId) -> Result<(), RequestError>;

    /// Removes any request regardless of status. Admin only.
    ///
    /// Returns `false` when the id was already gone.
    async fn delete_admin(&self, actor: Option<&Actor>, id: RequestId)
    -> Result<bool, RequestError>;

    /// Counts requests per status within the actor's scope.
    async fn stats(&self, actor: Option<&Actor>) -> Result<RequestStats, RequestError>;
}

/// Resolves the acting identity or fails with [`RequestError::AuthRequired`].
pub(crate) fn require_actor(actor: Option<&Actor>) -> Result<&Actor, RequestError> {
    actor.ok_or(RequestError::AuthRequired)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_documents_survive_anyhow_wrapping() {
        let err: anyhow::Error = CorruptDocument::new("softbuy_requests", "bad").into();
        let err = RequestError::from(err.context("loading requests"));
        assert!(matches!(err, RequestError::CorruptData(_)));
    }

    #[test]
    fn other_anyhow_errors_are_storage_errors() {
        let err = RequestError::from(anyhow::anyhow!("disk full"));
        assert!(matches!(err, RequestError::Storage(msg) if msg.contains("disk full")));
    }

    #[test]
    fn error_display() {
        let err = RequestError::InvalidTransition {
            id: RequestId::new(1001),
            from: RequestStatus::Rejected,
            to: RequestStatus::Solved,
        };
        assert_eq!(
            err.to_string(),
            "Request 1001 cannot move from rejected to solved"
        );
        assert_eq!(
            RequestError::NotFound(RequestId::new(7)).to_string(),
            "Request not found: 7"
        );
    }

    #[test]
    fn missing_actor_requires_auth() {
        assert!(matches!(require_actor(None), Err(RequestError::AuthRequired)));
    }
}
