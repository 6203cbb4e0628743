pub mod request;
pub mod user;

pub use request::{Category, Request, RequestStatus};
pub use user::{NewUser, UNKNOWN_EMAIL, UNKNOWN_USER_NAME, User, UserSummary};
