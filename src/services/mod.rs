pub mod export;
pub mod identity_service;
pub mod identity_service_impl;
pub mod lifecycle;
pub mod query;
pub mod request_service;
pub mod request_service_impl;
pub mod request_store;
pub mod seed;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use export::{DataExport, export_snapshot, write_export};
pub use identity_service::{AuthError, IdentityProvider, IdentityService};
pub use identity_service_impl::StoreIdentityService;
pub use lifecycle::Transition;
pub use query::{DateBucket, PAGE_SIZE, RequestPage, RequestQuery, RequestStats, RequestView, Scope};
pub use request_service::{NewRequest, RequestError, RequestService};
pub use request_service_impl::DefaultRequestService;
pub use request_store::{RequestPersistence, RequestStore};
pub use seed::seed_demo_data;
