use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Actor, Role, UserId};

/// Display name used when a request points at a user that no longer exists.
pub const UNKNOWN_USER_NAME: &str = "Unknown user";

/// Display email used when the owner has none on record.
pub const UNKNOWN_EMAIL: &str = "not specified";

/// A registered account as stored in the `softbuy_users` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub login: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub subscribe_news: bool,
    pub role: Role,
    #[serde(default)]
    pub registration_date: Option<DateTime<Utc>>,
    /// Plaintext demo credential; never leaves the users document.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
}

impl User {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    #[must_use]
    pub const fn actor(&self) -> Actor {
        Actor::new(self.id, self.role)
    }

    #[must_use]
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.full_name(),
            email: if self.email.is_empty() {
                UNKNOWN_EMAIL.to_string()
            } else {
                self.email.clone()
            },
            role: self.role,
        }
    }

    /// Copy of the user with the credential removed, for sessions and exports.
    #[must_use]
    pub fn without_password(&self) -> Self {
        Self {
            password: String::new(),
            ..self.clone()
        }
    }
}

/// The subset of a user joined onto requests for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Registration form input.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub last_name: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub email: String,
    pub login: String,
    pub phone: Option<String>,
    pub password: String,
    pub confirm_password: String,
    pub subscribe_news: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ivanov() -> User {
        User {
            id: UserId::new(2),
            login: "user".to_string(),
            email: "ivanov@example.com".to_string(),
            first_name: "Ivan".to_string(),
            last_name: "Ivanov".to_string(),
            middle_name: None,
            phone: None,
            subscribe_news: false,
            role: Role::User,
            registration_date: None,
            password: "user123".to_string(),
        }
    }

    #[test]
    fn summary_joins_names() {
        let summary = ivanov().summary();
        assert_eq!(summary.name, "Ivan Ivanov");
        assert_eq!(summary.email, "ivanov@example.com");
    }

    #[test]
    fn summary_falls_back_for_missing_email() {
        let mut user = ivanov();
        user.email.clear();
        assert_eq!(user.summary().email, UNKNOWN_EMAIL);
    }

    #[test]
    fn password_is_dropped_from_session_copy() {
        let json = serde_json::to_value(ivanov().without_password()).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["firstName"], "Ivan");
    }
}
