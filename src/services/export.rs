//! Snapshot of users and requests for download.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::db::Store;
use crate::domain::{Actor, Clock};
use crate::models::{Request, User};
use crate::services::request_service::{RequestError, require_actor};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataExport {
    pub users: Vec<User>,
    pub requests: Vec<Request>,
    pub export_date: DateTime<Utc>,
}

impl DataExport {
    /// `softbuy_export_<YYYY-MM-DD>.json` for the export date.
    #[must_use]
    pub fn default_file_name(&self) -> PathBuf {
        PathBuf::from(format!(
            "softbuy_export_{}.json",
            self.export_date.format("%Y-%m-%d")
        ))
    }
}

/// Collects every user (credentials stripped) and request.
///
/// # Errors
///
/// - [`RequestError::AuthRequired`] if there is no actor
/// - [`RequestError::Forbidden`] for non-admin actors
/// - [`RequestError::Storage`] or [`RequestError::CorruptData`] if loading fails
pub async fn export_snapshot(
    store: &Store,
    clock: &dyn Clock,
    actor: Option<&Actor>,
) -> Result<DataExport, RequestError> {
    let actor = require_actor(actor)?;
    if !actor.is_admin() {
        warn!(user_id = %actor.id, "Export refused for non-admin");
        return Err(RequestError::Forbidden(
            "export is available to administrators only".to_string(),
        ));
    }

    let users = store
        .load_users()
        .await
        .context("Failed to load users for export")?;
    let requests = store
        .load_requests()
        .await
        .context("Failed to load requests for export")?;

    Ok(DataExport {
        users: users.iter().map(User::without_password).collect(),
        requests,
        export_date: clock.now(),
    })
}

/// Writes `export` as pretty JSON. Returns the path written.
pub async fn write_export(export: &DataExport, path: Option<&Path>) -> Result<PathBuf> {
    let path = path.map_or_else(|| export.default_file_name(), Path::to_path_buf);
    let json = serde_json::to_string_pretty(export)?;

    tokio::fs::write(&path, json)
        .await
        .with_context(|| format!("Failed to write export to {}", path.display()))?;

    info!(
        path = %path.display(),
        users = export.users.len(),
        requests = export.requests.len(),
        "Data exported"
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FixedClock, UserId};
    use crate::services::seed::{demo_requests, demo_users, seed_demo_data};
    use chrono::TimeZone;

    fn export() -> DataExport {
        let now = Utc.with_ymd_and_hms(2024, 3, 23, 18, 5, 0).unwrap();
        DataExport {
            users: demo_users(now).iter().map(User::without_password).collect(),
            requests: demo_requests().unwrap(),
            export_date: now,
        }
    }

    #[test]
    fn file_name_uses_export_date() {
        assert_eq!(
            export().default_file_name(),
            PathBuf::from("softbuy_export_2024-03-23.json")
        );
    }

    #[test]
    fn json_shape() {
        let value = serde_json::to_value(export()).unwrap();
        assert!(value["exportDate"].is_string());
        assert_eq!(value["requests"].as_array().unwrap().len(), 4);
        for user in value["users"].as_array().unwrap() {
            assert!(user.get("password").is_none());
        }
    }

    #[tokio::test]
    async fn export_requires_admin() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 23, 12, 0, 0).unwrap());
        seed_demo_data(&store, &clock).await.unwrap();

        let err = export_snapshot(&store, &clock, None).await.unwrap_err();
        assert!(matches!(err, RequestError::AuthRequired));

        let user = Actor::user(UserId::new(2));
        let err = export_snapshot(&store, &clock, Some(&user))
            .await
            .unwrap_err();
        assert!(matches!(err, RequestError::Forbidden(_)));

        let admin = Actor::admin(UserId::new(1));
        let export = export_snapshot(&store, &clock, Some(&admin))
            .await
            .unwrap();
        assert_eq!(export.users.len(), 3);
    }
}
