//! Small value types shared by page and web-config models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Uploaded file (image, video, icon).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Asset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_dir: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimension {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

/// Reference to another entry, resolved inline through an include path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InternalLink {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(rename = "_content_type_uid", skip_serializing_if = "Option::is_none")]
    pub content_type_uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

/// Call to action: either an internal reference or an external URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Vec<InternalLink>>,
}

impl Cta {
    /// URL to navigate to: the first resolved internal link, else the external URL.
    pub fn href(&self) -> Option<&str> {
        self.link
            .iter()
            .flatten()
            .find_map(|l| l.url.as_deref())
            .or(self.external_url.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    /// String or number upstream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
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
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Video {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<Asset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_alt_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Styles {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_position: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Taxonomy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxonomy_uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_uid: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cta_prefers_internal_link() {
        let cta: Cta = serde_json::from_value(json!({
            "text": "Shop",
            "external_url": "https://example.com",
            "link": [{ "uid": "blt1", "_content_type_uid": "page", "url": "/shop" }]
        }))
        .unwrap();
        assert_eq!(cta.href(), Some("/shop"));
        assert_eq!(cta.link.as_ref().unwrap()[0].content_type_uid.as_deref(), Some("page"));
    }

    #[test]
    fn cta_falls_back_to_external_url() {
        let cta: Cta =
            serde_json::from_value(json!({ "external_url": "https://example.com", "link": [] }))
                .unwrap();
        assert_eq!(cta.href(), Some("https://example.com"));
    }

    #[test]
    fn absent_fields_are_not_serialized() {
        let asset = Asset {
            url: Some("https://images.example.com/a.png".into()),
            ..Asset::default()
        };
        assert_eq!(
            serde_json::to_value(&asset).unwrap(),
            json!({ "url": "https://images.example.com/a.png" })
        );
    }
}
