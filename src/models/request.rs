use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::{RequestId, UserId};

/// Lifecycle state of a support request.
///
/// `New` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    New,
    Solved,
    Rejected,
}

impl RequestStatus {
    pub const ALL: [Self; 3] = [Self::New, Self::Solved, Self::Rejected];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Solved => "solved",
            Self::Rejected => "rejected",
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::New)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown request status: {s}"))
    }
}

/// Closed set of request topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Installation,
    License,
    Bug,
    Update,
    Other,
}

impl Category {
    pub const ALL: [Self; 5] = [
        Self::Installation,
        Self::License,
        Self::Bug,
        Self::Update,
        Self::Other,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Installation => "installation",
            Self::License => "license",
            Self::Bug => "bug",
            Self::Update => "update",
            Self::Other => "other",
        }
    }

    /// Human readable label used by the command line output.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Installation => "Software installation",
            Self::License => "License problem",
            Self::Bug => "Program error",
            Self::Update => "Update",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown request category: {s}"))
    }
}

/// A support ticket as persisted in the `softbuy_requests` document.
///
/// Older documents spelled the rejection field `rejectedReason`; it is read
/// under that name too but always written back as `rejectionReason`. A record
/// carrying both spellings keeps the `rejectionReason` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredRequest")]
pub struct Request {
    pub id: RequestId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub solved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
}

/// On-disk shape of a request, including the legacy reason field.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRequest {
    id: RequestId,
    user_id: UserId,
    title: String,
    description: String,
    category: Category,
    status: RequestStatus,
    created_at: DateTime<Utc>,
    #[serde(default)]
    solved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    rejected_at: Option<DateTime<Utc>>,
    #[serde(default)]
    rejection_reason: Option<String>,
    #[serde(default)]
    rejected_reason: Option<String>,
}

impl From<StoredRequest> for Request {
    fn from(stored: StoredRequest) -> Self {
        Self {
            id: stored.id,
            user_id: stored.user_id,
            title: stored.title,
            description: stored.description,
            category: stored.category,
            status: stored.status,
            created_at: stored.created_at,
            solved_at: stored.solved_at,
            rejected_at: stored.rejected_at,
            rejection_reason: stored.rejection_reason.or(stored.rejected_reason),
        }
    }
}

impl Request {
    /// Checks the status/timestamp invariants of a single record.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated invariant.
    pub fn check_invariants(&self) -> Result<(), String> {
        let rejected = self.status == RequestStatus::Rejected;
        if rejected != self.rejection_reason.is_some() {
            return Err(format!(
                "request {}: rejection reason must be present exactly when status is rejected (status: {})",
                self.id, self.status
            ));
        }

        let solved = self.status == RequestStatus::Solved;
        if solved != self.solved_at.is_some() {
            return Err(format!(
                "request {}: solved timestamp must be present exactly when status is solved (status: {})",
                self.id, self.status
            ));
        }

        Ok(())
    }
}
