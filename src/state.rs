use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::domain::{Actor, Clock, SystemClock};
use crate::services::{
    DefaultRequestService, IdentityService, RequestService, StoreIdentityService,
};

/// Storage handle plus the services wired on top of it.
#[derive(Clone)]
pub struct SharedState {
    pub store: Store,

    pub clock: Arc<dyn Clock>,

    pub identity: Arc<dyn IdentityService>,

    pub requests: Arc<dyn RequestService>,
}

impl SharedState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_clock(store, Arc::new(SystemClock)))
    }

    #[must_use]
    pub fn with_clock(store: Store, clock: Arc<dyn Clock>) -> Self {
        let identity = Arc::new(StoreIdentityService::new(store.clone(), clock.clone()));

        let requests = Arc::new(DefaultRequestService::new(
            Arc::new(store.clone()),
            identity.clone(),
            clock.clone(),
        )) as Arc<dyn RequestService + Send + Sync + 'static>;

        Self {
            store,
            clock,
            identity,
            requests,
        }
    }

    /// The actor of the stored session, if someone is logged in.
    pub async fn session_actor(&self) -> anyhow::Result<Option<Actor>> {
        Ok(self.identity.current_actor().await?)
    }
}
