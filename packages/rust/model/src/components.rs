//! Payloads of the individual content blocks.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::{Asset, Cta, Image, Styles, Video};
use crate::rich_text::RichText;

// ---------------------------------------------------------------------------
// Page components
// ---------------------------------------------------------------------------

/// Placeholder for a component rendered from a frontend API call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiComponent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Teaser {
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
    #[serde(rename = "isABEnabled", skip_serializing_if = "Option::is_none")]
    pub is_ab_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styles: Option<Styles>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextAndImageCarousel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carousel_items: Option<Vec<TextAndImage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styles: Option<Styles>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextAndImage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Asset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta: Option<Vec<Cta>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styles: Option<Styles>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Asset>,
}

/// Free text block; `content` is usually a JSON RTE document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Text {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<RichText>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardCollectionHeader {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_heading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta: Option<Cta>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardCollection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<CardCollectionHeader>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<ImageCardItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageCardItem {
    /// `id`, `key` and `index` are strings or numbers upstream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Asset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<Asset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_alt_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_thumbnail: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta: Option<Cta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Product-group card collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PgpCardCollection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<CardCollectionHeader>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<PgpImageCardItem>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PgpImageCardItem {
    // Field name is misspelled in the content model.
    #[serde(rename = "contnet", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta: Option<PgpCta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Asset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_alt_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_thumbnail: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PgpCta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuickLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

// ---------------------------------------------------------------------------
// PDP components
// ---------------------------------------------------------------------------

/// Slot filled at render time by the frontend; upstream only labels it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicComponent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_component: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingPromoBanner {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_component: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Copy for anonymous visitors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest: Option<ShippingPromoBannerContent>,
    /// Copy for signed-in visitors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signed: Option<ShippingPromoBannerContent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingPromoBannerContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<RichText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_title: Option<RichText>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccordionGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_component: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<AccordionItem>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccordionItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<RichText>,
}
