//! Field rules for the registration form.

use regex::Regex;
use std::sync::OnceLock;

use crate::models::NewUser;

pub const MIN_PASSWORD_LEN: usize = 6;

fn get_regex(re: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    re.get_or_init(|| Regex::new(pattern).expect("Invalid regex pattern defined in code"))
}

fn is_person_name(value: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    get_regex(&RE, r"^[\p{L}\s-]+$").is_match(value)
}

fn is_email(value: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    get_regex(&RE, r"^[^\s@]+@[^\s@]+\.[^\s@]+$").is_match(value)
}

fn is_login(value: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    get_regex(&RE, r"^[a-zA-Z0-9_]{3,20}$").is_match(value)
}

/// A single failed field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

const REQUIRED: &str = "is required";

fn check_name(field: &'static str, value: &str, errors: &mut Vec<FieldError>) {
    let message = if value.is_empty() {
        REQUIRED
    } else if !is_person_name(value) {
        "may only contain letters, spaces and hyphens"
    } else {
        return;
    };
    errors.push(FieldError { field, message });
}

/// Checks every registration field and returns all failures, in form order.
///
/// Text fields are compared after trimming; passwords are taken as typed.
pub fn validate_registration(input: &NewUser) -> Vec<FieldError> {
    let mut errors = Vec::new();

    check_name("lastName", input.last_name.trim(), &mut errors);
    check_name("firstName", input.first_name.trim(), &mut errors);

    let email = input.email.trim();
    if email.is_empty() {
        errors.push(FieldError { field: "email", message: REQUIRED });
    } else if !is_email(email) {
        errors.push(FieldError { field: "email", message: "is not a valid address" });
    }

    let login = input.login.trim();
    if login.is_empty() {
        errors.push(FieldError { field: "login", message: REQUIRED });
    } else if !is_login(login) {
        errors.push(FieldError {
            field: "login",
            message: "must be 3-20 latin letters, digits or underscores",
        });
    }

    if input.password.is_empty() {
        errors.push(FieldError { field: "password", message: REQUIRED });
    } else if input.password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError {
            field: "password",
            message: "must be at least 6 characters",
        });
    }

    if input.confirm_password.is_empty() {
        errors.push(FieldError { field: "confirmPassword", message: REQUIRED });
    } else if input.confirm_password != input.password {
        errors.push(FieldError { field: "confirmPassword", message: "does not match" });
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> NewUser {
        NewUser {
            last_name: "Сидоров".to_string(),
            first_name: "Анна-Мария".to_string(),
            email: "sidorov@example.com".to_string(),
            login: "sidorov_1".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
            ..NewUser::default()
        }
    }

    fn fields(input: &NewUser) -> Vec<&'static str> {
        validate_registration(input).into_iter().map(|e| e.field).collect()
    }

    #[test]
    fn valid_form_passes() {
        assert!(validate_registration(&valid()).is_empty());
    }

    #[test]
    fn empty_form_reports_every_field() {
        assert_eq!(
            fields(&NewUser::default()),
            vec!["lastName", "firstName", "email", "login", "password", "confirmPassword"]
        );
    }

    #[test]
    fn names_reject_digits() {
        let input = NewUser {
            first_name: "R2D2".to_string(),
            ..valid()
        };
        assert_eq!(fields(&input), vec!["firstName"]);
    }

    #[test]
    fn email_shape() {
        for bad in ["plain", "a@b", "a b@c.d", "@c.d"] {
            let input = NewUser {
                email: bad.to_string(),
                ..valid()
            };
            assert_eq!(fields(&input), vec!["email"], "{bad}");
        }
    }

    #[test]
    fn login_shape() {
        let too_long = "x".repeat(21);
        for bad in ["ab", "has space", too_long.as_str(), "кириллица"] {
            let input = NewUser {
                login: bad.to_string(),
                ..valid()
            };
            assert_eq!(fields(&input), vec!["login"], "{bad}");
        }
    }

    #[test]
    fn password_rules() {
        let short = NewUser {
            password: "12345".to_string(),
            confirm_password: "12345".to_string(),
            ..valid()
        };
        assert_eq!(fields(&short), vec!["password"]);

        let mismatch = NewUser {
            confirm_password: "secret2".to_string(),
            ..valid()
        };
        assert_eq!(fields(&mismatch), vec!["confirmPassword"]);
    }
}
