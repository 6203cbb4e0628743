use std::collections::HashSet;

use anyhow::Result;
use sea_orm::DatabaseConnection;

use super::document::DocumentRepository;
use crate::db::codec::{self, CURRENT_SCHEMA_VERSION, CorruptDocument};
use crate::db::keys;
use crate::domain::UserId;
use crate::models::User;

pub struct UserRepository {
    documents: DocumentRepository,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self {
            documents: DocumentRepository::new(conn),
        }
    }

    pub async fn load(&self) -> Result<Vec<User>> {
        let Some(doc) = self.documents.get(keys::USERS).await? else {
            return Ok(Vec::new());
        };

        let users: Vec<User> = codec::decode_collection(keys::USERS, &doc)?;

        let mut seen = HashSet::with_capacity(users.len());
        if let Some(dup) = users.iter().find(|u| !seen.insert(u.id)) {
            return Err(
                CorruptDocument::new(keys::USERS, format!("duplicate user id {}", dup.id)).into(),
            );
        }

        Ok(users)
    }

    pub async fn save(&self, users: &[User]) -> Result<()> {
        let value = codec::encode(keys::USERS, users)?;
        self.documents
            .put(keys::USERS, value, CURRENT_SCHEMA_VERSION)
            .await
    }

    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.load().await?.into_iter().find(|u| u.id == id))
    }

    pub async fn get_by_login(&self, login: &str) -> Result<Option<User>> {
        Ok(self.load().await?.into_iter().find(|u| u.login == login))
    }
}
