use crate::domain::UserId;
use crate::models::{Request, User};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod codec;
pub mod migrator;
pub mod repositories;

pub use codec::{CURRENT_SCHEMA_VERSION, CorruptDocument};
pub use repositories::document::StoredDocument;

/// Document names in the key-value storage.
pub mod keys {
    pub const REQUESTS: &str = "softbuy_requests";
    pub const USERS: &str = "softbuy_users";
    pub const CURRENT_USER: &str = "softbuy_currentUser";
    pub const DATA_INITIALIZED: &str = "softbuy_data_initialized";
}

/// Handle to the host key-value storage.
///
/// Each collection is one JSON document that is read and rewritten as a whole.
/// Two handles writing the same document race with last-writer-wins semantics.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        // Every pooled connection to an in-memory database would see its own empty database.
        let in_memory = db_url.contains(":memory:");
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Storage connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn document_repo(&self) -> repositories::document::DocumentRepository {
        repositories::document::DocumentRepository::new(self.conn.clone())
    }

    fn request_repo(&self) -> repositories::request::RequestRepository {
        repositories::request::RequestRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn session_repo(&self) -> repositories::session::SessionRepository {
        repositories::session::SessionRepository::new(self.conn.clone())
    }

    pub async fn get_document(&self, key: &str) -> Result<Option<StoredDocument>> {
        self.document_repo().get(key).await
    }

    pub async fn put_document(&self, key: &str, value: String, schema_version: i32) -> Result<()> {
        self.document_repo().put(key, value, schema_version).await
    }

    pub async fn remove_document(&self, key: &str) -> Result<bool> {
        self.document_repo().remove(key).await
    }

    pub async fn document_keys(&self) -> Result<Vec<String>> {
        self.document_repo().keys().await
    }

    pub async fn load_requests(&self) -> Result<Vec<Request>> {
        self.request_repo().load().await
    }

    pub async fn save_requests(&self, requests: &[Request]) -> Result<()> {
        self.request_repo().save(requests).await
    }

    pub async fn load_users(&self) -> Result<Vec<User>> {
        self.user_repo().load().await
    }

    pub async fn save_users(&self, users: &[User]) -> Result<()> {
        self.user_repo().save(users).await
    }

    pub async fn get_user_by_id(&self, id: UserId) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_login(&self, login: &str) -> Result<Option<User>> {
        self.user_repo().get_by_login(login).await
    }

    pub async fn current_user(&self) -> Result<Option<User>> {
        self.session_repo().current().await
    }

    pub async fn set_current_user(&self, user: &User) -> Result<()> {
        self.session_repo().set_current(user).await
    }

    pub async fn clear_current_user(&self) -> Result<bool> {
        self.session_repo().clear().await
    }

    pub async fn is_data_initialized(&self) -> Result<bool> {
        self.session_repo().is_initialized().await
    }

    pub async fn mark_data_initialized(&self) -> Result<()> {
        self.session_repo().mark_initialized().await
    }
}
