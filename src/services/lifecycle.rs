//! Status state machine for support requests.
//!
//! ```text
//! new ──solve──▶ solved    (terminal)
//!  └──reject──▶ rejected  (terminal)
//! ```
//!
//! The guards live here rather than in any caller, so a request can never
//! leave a terminal state no matter who drives the transition.

use chrono::{DateTime, Utc};

use crate::domain::Actor;
use crate::models::{Request, RequestStatus};
use crate::services::request_service::RequestError;

/// A requested status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Solve,
    Reject { reason: String },
}

impl Transition {
    /// Builds a rejection, refusing a blank reason.
    pub fn reject(reason: &str) -> Result<Self, RequestError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(RequestError::Validation("reason required".to_string()));
        }
        Ok(Self::Reject {
            reason: reason.to_string(),
        })
    }

    #[must_use]
    pub const fn target(&self) -> RequestStatus {
        match self {
            Self::Solve => RequestStatus::Solved,
            Self::Reject { .. } => RequestStatus::Rejected,
        }
    }
}

/// Whether `from -> to` is an edge of the state machine.
#[must_use]
pub const fn can_transition(from: RequestStatus, to: RequestStatus) -> bool {
    matches!(
        (from, to),
        (RequestStatus::New, RequestStatus::Solved) | (RequestStatus::New, RequestStatus::Rejected)
    )
}

/// Applies `transition` to `request`, stamping the matching timestamp.
///
/// # Errors
///
/// Returns [`RequestError::InvalidTransition`] if the request is not `new`.
pub fn apply(
    request: &mut Request,
    transition: Transition,
    now: DateTime<Utc>,
) -> Result<(), RequestError> {
    let to = transition.target();
    if !can_transition(request.status, to) {
        return Err(RequestError::InvalidTransition {
            id: request.id,
            from: request.status,
            to,
        });
    }

    match transition {
        Transition::Solve => {
            request.status = RequestStatus::Solved;
            request.solved_at = Some(now);
        }
        Transition::Reject { reason } => {
            request.status = RequestStatus::Rejected;
            request.rejected_at = Some(now);
            request.rejection_reason = Some(reason);
        }
    }

    Ok(())
}

/// Status changes and administrative deletes need an admin.
pub fn ensure_admin(actor: &Actor, action: &str) -> Result<(), RequestError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(RequestError::Forbidden(format!(
            "only administrators may {action} requests"
        )))
    }
}

/// Owners may withdraw their own request while it is still `new`.
///
/// # Errors
///
/// - [`RequestError::Forbidden`] if `actor` is not the owner
/// - [`RequestError::InvalidState`] if the request has been solved or rejected
pub fn ensure_owner_can_withdraw(request: &Request, actor: &Actor) -> Result<(), RequestError> {
    if request.user_id != actor.id {
        return Err(RequestError::Forbidden(
            "you can only delete your own requests".to_string(),
        ));
    }

    if request.status != RequestStatus::New {
        return Err(RequestError::InvalidState {
            id: request.id,
            status: request.status,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RequestId, UserId};
    use crate::models::Category;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 21, 9, 0, 0).unwrap()
    }

    fn new_request() -> Request {
        Request {
            id: RequestId::new(1001),
            user_id: UserId::new(2),
            title: "Windows 11 will not install".to_string(),
            description: "This PC can't run Windows 11".to_string(),
            category: Category::Installation,
            status: RequestStatus::New,
            created_at: Utc.with_ymd_and_hms(2024, 3, 20, 14, 30, 0).unwrap(),
            solved_at: None,
            rejected_at: None,
            rejection_reason: None,
        }
    }

    #[test]
    fn solve_stamps_solved_at() {
        let mut request = new_request();
        apply(&mut request, Transition::Solve, now()).unwrap();
        assert_eq!(request.status, RequestStatus::Solved);
        assert_eq!(request.solved_at, Some(now()));
        assert!(request.check_invariants().is_ok());
    }

    #[test]
    fn reject_records_reason() {
        let mut request = new_request();
        apply(&mut request, Transition::reject("need more info").unwrap(), now()).unwrap();
        assert_eq!(request.status, RequestStatus::Rejected);
        assert_eq!(request.rejection_reason.as_deref(), Some("need more info"));
        assert_eq!(request.rejected_at, Some(now()));
        assert!(request.check_invariants().is_ok());
    }

    #[test]
    fn blank_reason_is_rejected() {
        assert!(matches!(
            Transition::reject("   "),
            Err(RequestError::Validation(msg)) if msg == "reason required"
        ));
    }

    #[test]
    fn terminal_states_do_not_transition() {
        let mut request = new_request();
        apply(&mut request, Transition::reject("duplicate").unwrap(), now()).unwrap();

        let before = request.clone();
        let err = apply(&mut request, Transition::Solve, now()).unwrap_err();
        assert!(matches!(
            err,
            RequestError::InvalidTransition {
                from: RequestStatus::Rejected,
                to: RequestStatus::Solved,
                ..
            }
        ));
        assert_eq!(request, before);
    }

    #[test]
    fn transition_table() {
        for to in [RequestStatus::Solved, RequestStatus::Rejected] {
            assert!(can_transition(RequestStatus::New, to));
            assert!(!can_transition(RequestStatus::Solved, to));
            assert!(!can_transition(RequestStatus::Rejected, to));
        }
        assert!(!can_transition(RequestStatus::New, RequestStatus::New));
    }

    #[test]
    fn withdrawal_rules() {
        let owner = Actor::user(UserId::new(2));
        let stranger = Actor::user(UserId::new(3));
        let mut request = new_request();

        assert!(ensure_owner_can_withdraw(&request, &owner).is_ok());
        assert!(matches!(
            ensure_owner_can_withdraw(&request, &stranger),
            Err(RequestError::Forbidden(_))
        ));

        request.status = RequestStatus::Rejected;
        request.rejection_reason = Some("outdated drivers".to_string());
        assert!(matches!(
            ensure_owner_can_withdraw(&request, &owner),
            Err(RequestError::InvalidState { status: RequestStatus::Rejected, .. })
        ));
    }

    #[test]
    fn admin_guard() {
        assert!(ensure_admin(&Actor::admin(UserId::new(1)), "solve").is_ok());
        assert!(matches!(
            ensure_admin(&Actor::user(UserId::new(2)), "solve"),
            Err(RequestError::Forbidden(_))
        ));
    }
}
