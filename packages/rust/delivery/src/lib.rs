//! Contentstack content-delivery plumbing.
//!
//! This crate provides:
//! - [`query`]: pure construction of delivery API request URLs
//! - [`client`]: single-attempt GET-and-decode against the delivery API
//! - [`envelope`]: the `{entries, count}` response wrapper and the
//!   first-entry selection policy

pub mod client;
pub mod envelope;
pub mod query;

pub use client::DeliveryClient;
pub use envelope::Envelope;
pub use query::{IncludeFlavor, Pagination, QueryBuilder, QuerySpec};
