//! In-memory collaborators for service unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::domain::{Actor, UserId};
use crate::models::{Request, UserSummary};
use crate::services::identity_service::{AuthError, IdentityProvider};
use crate::services::request_store::RequestPersistence;
use crate::services::request_service::RequestError;

#[derive(Default)]
pub struct MemoryPersistence {
    requests: Mutex<Vec<Request>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MemoryPersistence {
    pub fn with_requests(requests: Vec<Request>) -> Self {
        Self {
            requests: Mutex::new(requests),
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl RequestPersistence for MemoryPersistence {
    async fn load_requests(&self) -> Result<Vec<Request>, RequestError> {
        Ok(self.snapshot())
    }

    async fn save_requests(&self, requests: &[Request]) -> Result<(), RequestError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(RequestError::Storage("quota exceeded".to_string()));
        }
        *self.requests.lock().unwrap() = requests.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Fixed directory of users; the session actor is whatever the test sets.
#[derive(Default)]
pub struct StaticIdentity {
    pub users: HashMap<UserId, UserSummary>,
    pub current: Option<Actor>,
}

impl StaticIdentity {
    pub fn new(users: impl IntoIterator<Item = UserSummary>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
            current: None,
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_actor(&self) -> Result<Option<Actor>, AuthError> {
        Ok(self.current)
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<UserSummary>, AuthError> {
        Ok(self.users.get(&id).cloned())
    }

    async fn user_directory(&self) -> Result<HashMap<UserId, UserSummary>, AuthError> {
        Ok(self.users.clone())
    }
}
