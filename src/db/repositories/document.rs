use crate::entities::{documents, prelude::*};
use anyhow::{Context, Result};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set};

/// Raw document as it sits in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub value: String,
    pub schema_version: i32,
}

/// Whole-document access to the key-value storage.
///
/// There is no partial update: `put` replaces the previous value outright.
pub struct DocumentRepository {
    conn: DatabaseConnection,
}

impl DocumentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, key: &str) -> Result<Option<StoredDocument>> {
        let row = Documents::find_by_id(key.to_string())
            .one(&self.conn)
            .await
            .with_context(|| format!("Failed to read document '{key}'"))?;

        Ok(row.map(|m| StoredDocument {
            value: m.value,
            schema_version: m.schema_version,
        }))
    }

    pub async fn put(&self, key: &str, value: String, schema_version: i32) -> Result<()> {
        let active_model = documents::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value),
            schema_version: Set(schema_version),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        Documents::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(documents::Column::Key)
                    .update_columns([
                        documents::Column::Value,
                        documents::Column::SchemaVersion,
                        documents::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await
            .with_context(|| format!("Failed to write document '{key}'"))?;

        Ok(())
    }

    /// Returns whether a document was actually removed.
    pub async fn remove(&self, key: &str) -> Result<bool> {
        let result = Documents::delete_by_id(key.to_string())
            .exec(&self.conn)
            .await
            .with_context(|| format!("Failed to remove document '{key}'"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn keys(&self) -> Result<Vec<String>> {
        let keys = Documents::find()
            .select_only()
            .column(documents::Column::Key)
            .order_by_asc(documents::Column::Key)
            .into_tuple::<String>()
            .all(&self.conn)
            .await
            .context("Failed to list document keys")?;

        Ok(keys)
    }
}
