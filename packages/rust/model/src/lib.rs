//! Typed page-render models for Contentstack entries.
//!
//! Upstream entries are polymorphic and only loosely typed. Every model here
//! decodes permissively: unknown fields are ignored and missing fields fall
//! back to `None`/empty, so upstream schema additions never break a page.
//!
//! - [`rich_text`]: RTE fields that arrive as HTML or as a JSON document
//! - [`blocks`]: component blocks and their variant resolution
//! - [`components`]: payloads carried by those blocks
//! - [`page`]: landing/home/product page entries
//! - [`web_config`]: site chrome (navigation, footer, consent, forms)
//! - [`feature_flags`]: typed config lists and their merged view
//! - [`personalize`]: audience definitions
//! - [`entry`]: untyped entries with system metadata

pub mod blocks;
pub mod common;
pub mod components;
pub mod entry;
pub mod feature_flags;
pub mod page;
pub mod personalize;
pub mod rich_text;
pub mod web_config;

pub use blocks::{
    BlockKind, BlockUnion, BlockVariant, PageBlock, PdpPageBlock, PdpSlot, PdpVariant,
    VariantInfo, renderable,
};
pub use entry::{Entry, PublishDetail};
pub use feature_flags::{ConfigLists, ConfigValue, FeatureFlagConfig, MergedConfig, merge};
pub use page::PageEntry;
pub use personalize::PersonalizeConfig;
pub use rich_text::{RichText, RteElement, RteNode, RteText};
pub use web_config::WebConfig;
