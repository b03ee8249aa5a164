//! Shared error model and configuration for stackbff.
//!
//! This crate is the foundation depended on by all other stackbff crates.
//! It provides:
//! - [`BffError`]: the unified error type
//! - Configuration ([`AppConfig`], [`ContentstackConfig`], config loading)
//! - Delivery [`Credentials`] resolved from the environment

pub mod config;
pub mod error;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ContentstackConfig, Credentials, DEFAULT_BASE_URL, DEFAULT_ENVIRONMENT,
    HttpConfig, config_dir, config_file_path, init_config, load_config, load_config_from,
    resolve_credentials,
};
pub use error::{BffError, Result};
