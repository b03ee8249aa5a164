//! Landing, home and product page entries.

use serde::{Deserialize, Serialize};

use crate::blocks::{PageBlock, PdpPageBlock};
use crate::common::{Asset, Cta, Image, Styles, Taxonomy, Video};

/// One page entry with its render props.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxonomies: Option<Vec<Taxonomy>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<PageBlock>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero: Option<Vec<Hero>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo: Option<SeoProps>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<Vec<Media>>,
    /// Product detail blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<PdpPageBlock>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketing: Option<Vec<PdpPageBlock>>,
}

impl PageEntry {
    pub fn components(&self) -> &[PageBlock] {
        self.components.as_deref().unwrap_or_default()
    }

    pub fn details(&self) -> &[PdpPageBlock] {
        self.details.as_deref().unwrap_or_default()
    }

    pub fn marketing(&self) -> &[PdpPageBlock] {
        self.marketing.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hero {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta: Option<Vec<Cta>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Vec<Image>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<Video>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styles: Option<Styles>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<Asset>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeoProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_follow: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_index: Option<bool>,
}

/// Product media item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Media {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
