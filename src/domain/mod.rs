//! Domain primitives for the support-request core.
//!
//! Identifiers are newtypes so a request id can never be passed where a user
//! id is expected. The acting identity is always handed to services
//! explicitly as an [`Actor`]; nothing in the core reads an ambient session.

pub mod clock;

pub use clock::{Clock, FixedClock, SystemClock};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a support request.
///
/// # Examples
///
/// ```rust
/// use softbuy::domain::RequestId;
///
/// let id = RequestId::new(1001);
/// assert_eq!(id.value(), 1001);
/// assert_eq!(id.to_string(), "1001");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RequestId(i64);

impl RequestId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RequestId {
    fn from(id: i64) -> Self {
        Self::new(id)
    }
}

impl From<RequestId> for i64 {
    fn from(id: RequestId) -> Self {
        id.0
    }
}

/// Unique identifier of a registered user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self::new(id)
    }
}

/// Authority level of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated identity performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
}

impl Actor {
    #[must_use]
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    #[must_use]
    pub const fn admin(id: UserId) -> Self {
        Self::new(id, Role::Admin)
    }

    #[must_use]
    pub const fn user(id: UserId) -> Self {
        Self::new(id, Role::User)
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// Picks a timestamp-derived id that is not already taken.
///
/// Ids start at the creation instant in milliseconds and are bumped past any
/// collision, so two creates within the same millisecond still get distinct ids.
#[must_use]
pub fn allocate_id(now_millis: i64, taken: impl IntoIterator<Item = i64>) -> i64 {
    let mut taken: Vec<i64> = taken.into_iter().collect();
    taken.sort_unstable();

    let mut candidate = now_millis;
    for id in taken {
        if id == candidate {
            candidate += 1;
        } else if id > candidate {
            break;
        }
    }
    candidate
}
