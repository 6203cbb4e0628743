use std::collections::HashSet;

use anyhow::Result;
use sea_orm::DatabaseConnection;

use super::document::DocumentRepository;
use crate::db::codec::{self, CURRENT_SCHEMA_VERSION, CorruptDocument};
use crate::db::keys;
use crate::models::Request;

pub struct RequestRepository {
    documents: DocumentRepository,
}

impl RequestRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self {
            documents: DocumentRepository::new(conn),
        }
    }

    /// Loads and validates the whole request collection.
    ///
    /// A missing document is an empty collection.
    pub async fn load(&self) -> Result<Vec<Request>> {
        let Some(doc) = self.documents.get(keys::REQUESTS).await? else {
            return Ok(Vec::new());
        };

        let requests: Vec<Request> = codec::decode_collection(keys::REQUESTS, &doc)?;
        validate(&requests)?;
        Ok(requests)
    }

    /// Overwrites the stored collection.
    pub async fn save(&self, requests: &[Request]) -> Result<()> {
        validate(requests)?;
        let value = codec::encode(keys::REQUESTS, requests)?;
        self.documents
            .put(keys::REQUESTS, value, CURRENT_SCHEMA_VERSION)
            .await
    }
}

fn validate(requests: &[Request]) -> Result<(), CorruptDocument> {
    let mut seen = HashSet::with_capacity(requests.len());
    for request in requests {
        request
            .check_invariants()
            .map_err(|reason| CorruptDocument::new(keys::REQUESTS, reason))?;

        if !seen.insert(request.id) {
            return Err(CorruptDocument::new(
                keys::REQUESTS,
                format!("duplicate request id {}", request.id),
            ));
        }
    }
    Ok(())
}
