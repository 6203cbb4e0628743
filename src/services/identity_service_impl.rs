//! `Store`-backed implementation of the identity traits.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::db::Store;
use crate::domain::{Actor, Clock, Role, UserId, allocate_id};
use crate::models::{NewUser, User, UserSummary};
use crate::services::identity_service::{AuthError, IdentityProvider, IdentityService};
use crate::services::validation::validate_registration;

pub struct StoreIdentityService {
    store: Store,
    clock: Arc<dyn Clock>,
}

impl StoreIdentityService {
    #[must_use]
    pub fn new(store: Store, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl IdentityProvider for StoreIdentityService {
    async fn current_actor(&self) -> Result<Option<Actor>, AuthError> {
        Ok(self.store.current_user().await?.map(|u| u.actor()))
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<UserSummary>, AuthError> {
        Ok(self.store.get_user_by_id(id).await?.map(|u| u.summary()))
    }

    async fn user_directory(&self) -> Result<HashMap<UserId, UserSummary>, AuthError> {
        let users = self.store.load_users().await?;
        Ok(users.iter().map(|u| (u.id, u.summary())).collect())
    }
}

#[async_trait]
impl IdentityService for StoreIdentityService {
    async fn register(&self, input: NewUser) -> Result<User, AuthError> {
        let errors = validate_registration(&input);
        if !errors.is_empty() {
            let joined = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(AuthError::Validation(joined));
        }

        let login = input.login.trim().to_string();
        let email = input.email.trim().to_string();

        let mut users = self.store.load_users().await?;
        if users.iter().any(|u| u.login == login) {
            return Err(AuthError::Conflict(format!("login '{login}'")));
        }
        if users.iter().any(|u| u.email == email) {
            return Err(AuthError::Conflict(format!("email '{email}'")));
        }

        let now = self.clock.now();
        let id = allocate_id(now.timestamp_millis(), users.iter().map(|u| u.id.value()));

        let user = User {
            id: UserId::new(id),
            login,
            email,
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            middle_name: non_empty(input.middle_name),
            phone: non_empty(input.phone),
            subscribe_news: input.subscribe_news,
            role: Role::User,
            registration_date: Some(now),
            password: input.password,
        };

        users.push(user.clone());
        self.store.save_users(&users).await?;

        info!(user_id = %user.id, login = %user.login, "User registered");
        Ok(user.without_password())
    }

    async fn login(&self, login: &str, password: &str) -> Result<User, AuthError> {
        let login = login.trim();
        if login.is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "login and password are required".to_string(),
            ));
        }

        let user = self
            .store
            .get_user_by_login(login)
            .await?
            .filter(|u| u.password == password);

        let Some(user) = user else {
            warn!(login = %login, "Login failed");
            return Err(AuthError::InvalidCredentials);
        };

        self.store.set_current_user(&user).await?;
        info!(user_id = %user.id, role = %user.role, "User logged in");
        Ok(user.without_password())
    }

    async fn logout(&self) -> Result<bool, AuthError> {
        let had_session = self.store.clear_current_user().await?;
        if had_session {
            info!("User logged out");
        }
        Ok(had_session)
    }

    async fn current_user(&self) -> Result<Option<User>, AuthError> {
        Ok(self.store.current_user().await?)
    }

    async fn list_users(&self) -> Result<Vec<User>, AuthError> {
        let users = self.store.load_users().await?;
        Ok(users.iter().map(User::without_password).collect())
    }
}
