//! Include-path sets for the Contentstack delivery API.
//!
//! Reference and JSON-RTE fields are only returned inline when the request
//! names them with `include[]` parameters. This crate holds those paths as
//! static base sets and composes them into the per-page-type sets the
//! delivery layer sends:
//! - [`IncludePathSet`]: ordered, duplicate-free set of dot paths
//! - [`registry`]: base sets, [`Composite`] names and [`composite`] lookup

pub mod registry;
mod set;

pub use registry::{Composite, UnknownComposite, composite};
pub use set::IncludePathSet;
