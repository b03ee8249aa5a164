//! Site chrome: navigation, footer menus, consent modal and user forms.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::{Asset, InternalLink};
use crate::rich_text::RichText;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<Asset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_navigation: Option<Vec<Navigation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_navigation: Option<Vec<Menu>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent_modal: Option<ConsentModal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_form: Option<Vec<UserFormModal>>,
}

// ---------------------------------------------------------------------------
// Header navigation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Navigation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<NavItems>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavItems {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Vec<InternalLink>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mega_menu: Option<Vec<MegaMenu>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MegaMenu {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<MegaMenuSection>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_group: Option<Vec<CtaGroup>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CtaGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_to_action: Option<Vec<CallToAction>>,
}

/// Mega-menu column. Editors add ad-hoc fields per section; those are kept
/// verbatim in `dynamic`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MegaMenuSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Vec<InternalLink>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<SectionLink>>,
    #[serde(flatten)]
    pub dynamic: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallToAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Asset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_link: Option<Vec<InternalLink>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionLink {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Asset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Vec<InternalLink>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_link: Option<String>,
}

// ---------------------------------------------------------------------------
// Footer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Menu {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub built_by: Option<RichText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright_info: Option<RichText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<FooterSection>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Vec<InternalLink>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<FooterLink>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterLink {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Vec<InternalLink>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_link: Option<String>,
}

impl FooterLink {
    /// Internal link URL if resolved, else the external link.
    pub fn href(&self) -> Option<&str> {
        self.link
            .iter()
            .flatten()
            .find_map(|l| l.url.as_deref())
            .or(self.external_link.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Consent and forms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsentModal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Asset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent_actions: Option<Vec<ConsentAction>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsentAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserFormModal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Asset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_button: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookies_consent: Option<CookiesConsent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<Form>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookiesConsent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Asset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Form {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FormField>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_consent_text: Option<RichText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submit: Option<Submit>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormField {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Validation regex, applied client-side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Submit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submit_button_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitting_button_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_heading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_navigation_footer_and_form() {
        let config: WebConfig = serde_json::from_value(json!({
            "uid": "bltweb",
            "locale": "en-us",
            "logo": { "url": "https://img/logo.svg", "filename": "logo.svg" },
            "main_navigation": [{
                "title": "Main",
                "items": [{
                    "text": "Women",
                    "link": [{ "uid": "blt1", "_content_type_uid": "page", "url": "/women" }],
                    "mega_menu": [{
                        "title": "Women",
                        "sections": [{
                            "title": "Clothing",
                            "links": [{ "text": "Dresses", "url": "/women/dresses" }],
                            "promo_badge": "New"
                        }],
                        "cta_group": [{ "call_to_action": [{ "text": "All women", "external_link": "/w" }] }]
                    }]
                }]
            }],
            "footer_navigation": [{
                "title": "Footer",
                "copyright_info": "<p>&copy; 2026 Shop</p>",
                "built_by": { "type": "doc", "children": [{ "text": "Built in-house" }] },
                "sections": [{ "title": "Help", "links": [{ "text": "FAQ", "external_link": "/faq" }] }]
            }],
            "user_form": [{
                "heading": "Stay in touch",
                "form": {
                    "fields": [{ "name": "email", "type": "email", "required": true }],
                    "user_consent_text": { "type": "doc", "children": [] },
                    "submit": { "submit_button_text": "Sign up" }
                }
            }],
            "_version": 12
        }))
        .unwrap();

        let item = &config.main_navigation.as_ref().unwrap()[0].items.as_ref().unwrap()[0];
        let section = &item.mega_menu.as_ref().unwrap()[0].sections.as_ref().unwrap()[0];
        assert_eq!(section.title.as_deref(), Some("Clothing"));
        assert_eq!(section.dynamic["promo_badge"], "New");
        assert!(!section.dynamic.contains_key("title"));

        let footer = &config.footer_navigation.as_ref().unwrap()[0];
        assert_eq!(footer.copyright_info.as_ref().unwrap().plain_text(), "\u{a9} 2026 Shop");
        assert_eq!(footer.built_by.as_ref().unwrap().plain_text(), "Built in-house");
        let link = &footer.sections.as_ref().unwrap()[0].links.as_ref().unwrap()[0];
        assert_eq!(link.href(), Some("/faq"));

        let form = config.user_form.as_ref().unwrap()[0].form.as_ref().unwrap();
        let field = &form.fields.as_ref().unwrap()[0];
        assert_eq!(field.kind.as_deref(), Some("email"));
        assert_eq!(field.required, Some(true));
    }

    #[test]
    fn section_extras_round_trip_at_top_level() {
        let raw = json!({ "title": "Sale", "highlight": true });
        let section: MegaMenuSection = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&section).unwrap(), raw);
    }
}
