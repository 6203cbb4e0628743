//! CRUD over the request collection.
//!
//! Every mutation is a full read-modify-write of the collection through the
//! [`RequestPersistence`] port. There is no locking: concurrent writers race
//! and the last save wins.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::db::Store;
use crate::domain::{Clock, RequestId, UserId, allocate_id};
use crate::models::{Request, RequestStatus};
use crate::services::request_service::{NewRequest, RequestError};

/// Where the request collection lives.
#[async_trait]
pub trait RequestPersistence: Send + Sync {
    async fn load_requests(&self) -> Result<Vec<Request>, RequestError>;

    async fn save_requests(&self, requests: &[Request]) -> Result<(), RequestError>;
}

#[async_trait]
impl RequestPersistence for Store {
    async fn load_requests(&self) -> Result<Vec<Request>, RequestError> {
        Ok(Store::load_requests(self).await?)
    }

    async fn save_requests(&self, requests: &[Request]) -> Result<(), RequestError> {
        Ok(Store::save_requests(self, requests).await?)
    }
}

pub struct RequestStore {
    persistence: Arc<dyn RequestPersistence>,
    clock: Arc<dyn Clock>,
}

impl RequestStore {
    #[must_use]
    pub fn new(persistence: Arc<dyn RequestPersistence>, clock: Arc<dyn Clock>) -> Self {
        Self { persistence, clock }
    }

    /// Appends a new request owned by `user_id`.
    ///
    /// # Errors
    ///
    /// - [`RequestError::Validation`] naming every empty field
    /// - [`RequestError::AuthRequired`] if `user_id` is `None`
    pub async fn create(
        &self,
        user_id: Option<UserId>,
        request: NewRequest,
    ) -> Result<Request, RequestError> {
        let title = request.title.trim();
        let description = request.description.trim();

        let mut missing = Vec::new();
        if title.is_empty() {
            missing.push("title");
        }
        if description.is_empty() {
            missing.push("description");
        }
        if request.category.is_none() {
            missing.push("category");
        }
        let Some(category) = request.category.filter(|_| missing.is_empty()) else {
            return Err(RequestError::Validation(format!(
                "{} required",
                missing.join(", ")
            )));
        };

        let user_id = user_id.ok_or(RequestError::AuthRequired)?;

        let mut requests = self.persistence.load_requests().await?;
        let now = self.clock.now();
        let id = allocate_id(
            now.timestamp_millis(),
            requests.iter().map(|r| r.id.value()),
        );

        let created = Request {
            id: RequestId::new(id),
            user_id,
            title: title.to_string(),
            description: description.to_string(),
            category,
            status: RequestStatus::New,
            created_at: now,
            solved_at: None,
            rejected_at: None,
            rejection_reason: None,
        };

        requests.push(created.clone());
        self.persistence.save_requests(&requests).await?;

        info!(request_id = %created.id, user_id = %user_id, category = %category, "Request created");
        Ok(created)
    }

    pub async fn find_by_id(&self, id: RequestId) -> Result<Request, RequestError> {
        self.persistence
            .load_requests()
            .await?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or(RequestError::NotFound(id))
    }

    /// All requests in storage order.
    pub async fn list_all(&self) -> Result<Vec<Request>, RequestError> {
        self.persistence.load_requests().await
    }

    /// Applies `mutator` to the request with `id` and persists the collection.
    ///
    /// The mutation runs on a copy; if it fails nothing is written.
    ///
    /// # Errors
    ///
    /// - [`RequestError::NotFound`] if the id is absent
    /// - whatever `mutator` returns
    pub async fn update<F>(&self, id: RequestId, mutator: F) -> Result<Request, RequestError>
    where
        F: FnOnce(&mut Request) -> Result<(), RequestError> + Send,
    {
        let mut requests = self.persistence.load_requests().await?;
        let slot = requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(RequestError::NotFound(id))?;

        let mut updated = slot.clone();
        mutator(&mut updated)?;
        *slot = updated.clone();

        self.persistence.save_requests(&requests).await?;
        debug!(request_id = %id, status = %updated.status, "Request updated");
        Ok(updated)
    }

    /// Drops the request with `id`. Removing a missing id is a no-op.
    ///
    /// Returns whether anything was removed.
    pub async fn remove(&self, id: RequestId) -> Result<bool, RequestError> {
        let mut requests = self.persistence.load_requests().await?;
        let before = requests.len();
        requests.retain(|r| r.id != id);

        if requests.len() == before {
            return Ok(false);
        }

        self.persistence.save_requests(&requests).await?;
        debug!(request_id = %id, "Request removed");
        Ok(true)
    }
}
