//! Content operations of the stackbff backend-for-frontend.
//!
//! [`ContentService`] ties the include-path registry, query construction,
//! the delivery client and the typed models together: one call per page-level
//! need (site chrome, landing page, feature flags, ...), each a single
//! upstream request resolved to a typed result or one error.

pub mod request;
pub mod service;

pub use request::EntryRequest;
pub use service::ContentService;
