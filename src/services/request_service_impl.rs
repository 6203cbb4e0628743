//! Default implementation of the `RequestService` trait.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::{Actor, Clock, RequestId};
use crate::models::Request;
use crate::services::identity_service::IdentityProvider;
use crate::services::lifecycle::{self, Transition};
use crate::services::query::{self, RequestPage, RequestQuery, RequestStats, RequestView, Scope};
use crate::services::request_service::{NewRequest, RequestError, RequestService, require_actor};
use crate::services::request_store::{RequestPersistence, RequestStore};

pub struct DefaultRequestService {
    store: RequestStore,
    identity: Arc<dyn IdentityProvider>,
    clock: Arc<dyn Clock>,
}

impl DefaultRequestService {
    #[must_use]
    pub fn new(
        persistence: Arc<dyn RequestPersistence>,
        identity: Arc<dyn IdentityProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store: RequestStore::new(persistence, clock.clone()),
            identity,
            clock,
        }
    }

    async fn transition(
        &self,
        actor: &Actor,
        id: RequestId,
        transition: Transition,
    ) -> Result<Request, RequestError> {
        let now = self.clock.now();
        let target = transition.target();

        let updated = self
            .store
            .update(id, |request| lifecycle::apply(request, transition, now))
            .await?;

        metrics::counter!("softbuy_request_transitions_total", "to" => target.as_str())
            .increment(1);
        info!(request_id = %id, admin_id = %actor.id, status = %target, "Request status changed");
        Ok(updated)
    }
}

#[async_trait]
impl RequestService for DefaultRequestService {
    async fn create_request(
        &self,
        actor: Option<&Actor>,
        request: NewRequest,
    ) -> Result<Request, RequestError> {
        let created = self.store.create(actor.map(|a| a.id), request).await?;
        metrics::counter!("softbuy_requests_created_total", "category" => created.category.as_str())
            .increment(1);
        Ok(created)
    }

    async fn get_request(
        &self,
        actor: Option<&Actor>,
        id: RequestId,
    ) -> Result<RequestView, RequestError> {
        let actor = require_actor(actor)?;
        let request = self.store.find_by_id(id).await?;

        let scope = Scope::for_actor(actor);
        if !scope.includes(&request) {
            return Err(RequestError::NotFound(id));
        }

        if scope.shows_owner() {
            let owner = self.identity.find_user_by_id(request.user_id).await?;
            Ok(RequestView::with_owner(request, owner.as_ref()))
        } else {
            Ok(RequestView::plain(request))
        }
    }

    async fn list_requests(
        &self,
        actor: Option<&Actor>,
        query: &RequestQuery,
    ) -> Result<RequestPage, RequestError> {
        let actor = require_actor(actor)?;
        let scope = Scope::for_actor(actor);
        let requests = self.store.list_all().await?;

        let owners = if scope.shows_owner() {
            self.identity.user_directory().await?
        } else {
            HashMap::new()
        };

        let page = query::run(requests, &owners, scope, query, self.clock.now());
        debug!(
            actor_id = %actor.id,
            matched = page.total_count,
            page = page.page,
            total_pages = page.total_pages,
            "Listed requests"
        );
        Ok(page)
    }

    async fn solve(&self, actor: Option<&Actor>, id: RequestId) -> Result<Request, RequestError> {
        let actor = require_actor(actor)?;
        lifecycle::ensure_admin(actor, "solve")?;
        self.transition(actor, id, Transition::Solve).await
    }

    async fn reject(
        &self,
        actor: Option<&Actor>,
        id: RequestId,
        reason: &str,
    ) -> Result<Request, RequestError> {
        let actor = require_actor(actor)?;
        lifecycle::ensure_admin(actor, "reject")?;
        let transition = Transition::reject(reason)?;
        self.transition(actor, id, transition).await
    }

    async fn delete_own(&self, actor: Option<&Actor>, id: RequestId) -> Result<(), RequestError> {
        let actor = require_actor(actor)?;
        let request = self.store.find_by_id(id).await?;
        lifecycle::ensure_owner_can_withdraw(&request, actor)?;

        self.store.remove(id).await?;
        metrics::counter!("softbuy_requests_deleted_total", "by" => "owner").increment(1);
        info!(request_id = %id, user_id = %actor.id, "Request withdrawn by owner");
        Ok(())
    }

    async fn delete_admin(
        &self,
        actor: Option<&Actor>,
        id: RequestId,
    ) -> Result<bool, RequestError> {
        let actor = require_actor(actor)?;
        lifecycle::ensure_admin(actor, "delete")?;

        let removed = self.store.remove(id).await?;
        if removed {
            metrics::counter!("softbuy_requests_deleted_total", "by" => "admin").increment(1);
            info!(request_id = %id, admin_id = %actor.id, "Request deleted by admin");
        } else {
            warn!(request_id = %id, admin_id = %actor.id, "Delete of missing request ignored");
        }
        Ok(removed)
    }

    async fn stats(&self, actor: Option<&Actor>) -> Result<RequestStats, RequestError> {
        let actor = require_actor(actor)?;
        let scope = Scope::for_actor(actor);
        let requests = self.store.list_all().await?;
        Ok(RequestStats::tally(
            requests.iter().filter(|r| scope.includes(r)),
        ))
    }
}
