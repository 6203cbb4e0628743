//! Filtering, sorting and pagination over the request collection.
//!
//! The same pipeline serves the admin panel (every request, owner details
//! attached) and the user dashboard (own requests only). Stages run in a
//! fixed order: scope, status, category, date bucket, search, sort, page.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, Months, NaiveTime, Utc};
use serde::Serialize;

use crate::domain::{Actor, UserId};
use crate::models::{
    Category, Request, RequestStatus, UNKNOWN_EMAIL, UNKNOWN_USER_NAME, UserSummary,
};

pub const PAGE_SIZE: usize = 10;

/// Creation-date window, measured back from "now" on the UTC calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateBucket {
    #[default]
    All,
    /// Created on today's calendar date.
    Today,
    /// Created since midnight seven days ago.
    Week,
    /// Created since midnight of the same day last month.
    Month,
}

impl DateBucket {
    /// Inclusive lower bound for `created_at`, or `None` for [`DateBucket::All`].
    ///
    /// Month arithmetic clamps to the last valid day, so March 31 looks back
    /// to February 28 (or 29).
    #[must_use]
    pub fn start(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let today = now.date_naive();
        let day = match self {
            Self::All => return None,
            Self::Today => today,
            Self::Week => today.checked_sub_days(Days::new(7))?,
            Self::Month => today
                .checked_sub_months(Months::new(1))
                .or_else(|| today.checked_sub_days(Days::new(31)))?,
        };
        Some(day.and_time(NaiveTime::MIN).and_utc())
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl fmt::Display for DateBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "today" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(format!("Unknown date filter: {other}")),
        }
    }
}

/// Which requests a caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    Owner(UserId),
}

impl Scope {
    #[must_use]
    pub const fn for_actor(actor: &Actor) -> Self {
        if actor.is_admin() {
            Self::All
        } else {
            Self::Owner(actor.id)
        }
    }

    #[must_use]
    pub fn includes(&self, request: &Request) -> bool {
        match self {
            Self::All => true,
            Self::Owner(id) => request.user_id == *id,
        }
    }

    /// Admin views join owner details onto each row.
    #[must_use]
    pub const fn shows_owner(&self) -> bool {
        matches!(self, Self::All)
    }
}

/// Filter state of a list view. `None` filters mean "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestQuery {
    pub status: Option<RequestStatus>,
    pub category: Option<Category>,
    pub date: DateBucket,
    pub search: String,
    /// 1-based page the caller last looked at; clamped to the valid range.
    pub page: usize,
}

/// A request as shown in a list, with owner details in admin views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestView {
    #[serde(flatten)]
    pub request: Request,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
}

impl RequestView {
    #[must_use]
    pub const fn plain(request: Request) -> Self {
        Self {
            request,
            owner_name: None,
            owner_email: None,
        }
    }

    /// Attaches owner details, falling back to placeholders for dangling owners.
    #[must_use]
    pub fn with_owner(request: Request, owner: Option<&UserSummary>) -> Self {
        let (name, email) = owner.map_or_else(
            || (UNKNOWN_USER_NAME.to_string(), UNKNOWN_EMAIL.to_string()),
            |o| (o.name.clone(), o.email.clone()),
        );
        Self {
            request,
            owner_name: Some(name),
            owner_email: Some(email),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPage {
    pub items: Vec<RequestView>,
    pub page: usize,
    pub total_pages: usize,
    pub total_count: usize,
}

/// Per-status counters for dashboards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RequestStats {
    pub total: usize,
    pub new: usize,
    pub solved: usize,
    pub rejected: usize,
}

impl RequestStats {
    pub fn tally<'a>(requests: impl IntoIterator<Item = &'a Request>) -> Self {
        requests
            .into_iter()
            .fold(Self::default(), |mut stats, request| {
                stats.total += 1;
                match request.status {
                    RequestStatus::New => stats.new += 1,
                    RequestStatus::Solved => stats.solved += 1,
                    RequestStatus::Rejected => stats.rejected += 1,
                }
                stats
            })
    }
}

/// Runs the full pipeline over `requests`.
///
/// `owners` is only consulted for views that show owners; a missing entry
/// yields the "unknown user" placeholder rather than an error.
#[must_use]
pub fn run(
    requests: Vec<Request>,
    owners: &HashMap<UserId, UserSummary>,
    scope: Scope,
    query: &RequestQuery,
    now: DateTime<Utc>,
) -> RequestPage {
    let date_start = query.date.start(now);
    let needle = query.search.trim().to_lowercase();

    let mut rows: Vec<RequestView> = requests
        .into_iter()
        .filter(|r| scope.includes(r))
        .filter(|r| query.status.is_none_or(|s| r.status == s))
        .filter(|r| query.category.is_none_or(|c| r.category == c))
        .filter(|r| date_start.is_none_or(|start| r.created_at >= start))
        .map(|r| {
            if scope.shows_owner() {
                let owner = owners.get(&r.user_id);
                RequestView::with_owner(r, owner)
            } else {
                RequestView::plain(r)
            }
        })
        .filter(|view| needle.is_empty() || matches_search(view, &needle))
        .collect();

    // Stable: equal timestamps keep storage order.
    rows.sort_by(|a, b| b.request.created_at.cmp(&a.request.created_at));

    paginate(rows, query.page)
}

fn matches_search(view: &RequestView, needle: &str) -> bool {
    let fields = [
        Some(view.request.title.as_str()),
        Some(view.request.description.as_str()),
        view.owner_name.as_deref(),
        view.owner_email.as_deref(),
    ];

    fields
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Cuts one page out of an already sorted list.
///
/// A page past the end is pulled back to the last page; page 0 means page 1.
#[must_use]
pub fn paginate(rows: Vec<RequestView>, requested_page: usize) -> RequestPage {
    let total_count = rows.len();
    let total_pages = total_count.div_ceil(PAGE_SIZE);
    let page = requested_page.max(1).min(total_pages.max(1));

    let items = rows
        .into_iter()
        .skip((page - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .collect();

    RequestPage {
        items,
        page,
        total_pages,
        total_count,
    }
}
