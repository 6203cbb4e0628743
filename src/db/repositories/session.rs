use anyhow::Result;
use sea_orm::DatabaseConnection;

use super::document::DocumentRepository;
use crate::db::codec::{self, CURRENT_SCHEMA_VERSION, CorruptDocument};
use crate::db::keys;
use crate::models::User;

/// The logged-in user and the one-time seeding flag.
pub struct SessionRepository {
    documents: DocumentRepository,
}

impl SessionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self {
            documents: DocumentRepository::new(conn),
        }
    }

    pub async fn current(&self) -> Result<Option<User>> {
        let Some(doc) = self.documents.get(keys::CURRENT_USER).await? else {
            return Ok(None);
        };

        let value = codec::decode_value(keys::CURRENT_USER, &doc)?;
        if value.is_null() {
            return Ok(None);
        }

        let user = serde_json::from_value(value)
            .map_err(|e| CorruptDocument::new(keys::CURRENT_USER, e.to_string()))?;
        Ok(Some(user))
    }

    pub async fn set_current(&self, user: &User) -> Result<()> {
        let value = codec::encode(keys::CURRENT_USER, &user.without_password())?;
        self.documents
            .put(keys::CURRENT_USER, value, CURRENT_SCHEMA_VERSION)
            .await
    }

    pub async fn clear(&self) -> Result<bool> {
        self.documents.remove(keys::CURRENT_USER).await
    }

    pub async fn is_initialized(&self) -> Result<bool> {
        Ok(self
            .documents
            .get(keys::DATA_INITIALIZED)
            .await?
            .is_some_and(|doc| doc.value.trim() == "true"))
    }

    pub async fn mark_initialized(&self) -> Result<()> {
        self.documents
            .put(keys::DATA_INITIALIZED, "true".to_string(), CURRENT_SCHEMA_VERSION)
            .await
    }
}
