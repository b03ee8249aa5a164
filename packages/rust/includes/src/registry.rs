//! Static include-path tables.
//!
//! Base sets name the reference and JSON-RTE fields of one content shape.
//! Composites are the deduplicated concatenation of base sets, in declaration
//! order, built once per process on first use and never mutated afterwards.

use std::str::FromStr;
use std::sync::LazyLock;

use crate::IncludePathSet;

// ---------------------------------------------------------------------------
// Reference base sets
// ---------------------------------------------------------------------------

pub const DYNAMIC_COMPONENT_REFERENCES: &[&str] = &["dynamic_component"];

pub const HERO_REFERENCES: &[&str] = &["hero", "hero.cta.link"];

pub const TEASER_REFERENCES: &[&str] = &["components.teaser.cta.link"];

pub const TEXT_AND_IMAGE_REFERENCES: &[&str] =
    &["components.text_and_image_carousel.carousel_items.cta.link"];

pub const IMAGE_CARDS_REFERENCES: &[&str] = &["components.card_collection.cards.cta.link"];

pub const FEATURED_ARTICLES_REFERENCES: &[&str] = &["featured_articles.articles"];

pub const QUICK_LINKS_REFERENCES: &[&str] =
    &["quick_links", "quick_links.items", "quick_links.items.link"];

pub const NAVIGATION_REFERENCES: &[&str] = &[
    "main_navigation",
    "main_navigation.items",
    "main_navigation.items.link",
    "main_navigation.items.mega_menu",
    "main_navigation.items.mega_menu.sections",
    "main_navigation.items.mega_menu.sections.link",
    "main_navigation.items.mega_menu.sections.links",
    "main_navigation.items.mega_menu.sections.links.link",
];

pub const FOOTER_REFERENCES: &[&str] = &[
    "footer_navigation",
    "footer_navigation.sections",
    "footer_navigation.sections.link",
    "footer_navigation.sections.links",
    "footer_navigation.sections.links.link",
];

pub const USER_FORM_REFERENCES: &[&str] = &["user_form"];

// ---------------------------------------------------------------------------
// JSON RTE base sets
// ---------------------------------------------------------------------------

pub const TEXT_RTE_PATHS: &[&str] = &["components.text.content"];

pub const FOOTER_RTE_PATHS: &[&str] = &[
    "footer_navigation.copyright_info",
    "footer_navigation.built_by",
];

pub const ARTICLE_RTE_PATHS: &[&str] = &["content"];

pub const USER_FORM_RTE_PATHS: &[&str] = &["user_form.form.user_consent_text"];

// ---------------------------------------------------------------------------
// Composites
// ---------------------------------------------------------------------------

/// Named composite include-path sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Composite {
    /// Header, footer and form references of the web config entry.
    WebConfigReferences,
    /// Footer and form rich-text fields of the web config entry.
    WebConfigRte,
    /// Everything the web-config request asks for: quick links, then the
    /// two web config composites.
    WebConfigRequest,
    /// Landing/home page components and their CTAs.
    LandingPage,
    /// Article body rich text.
    Article,
}

impl Composite {
    /// All composites, in table order.
    pub const ALL: [Composite; 5] = [
        Composite::WebConfigReferences,
        Composite::WebConfigRte,
        Composite::WebConfigRequest,
        Composite::LandingPage,
        Composite::Article,
    ];

    /// Stable kebab-case name.
    pub fn name(self) -> &'static str {
        match self {
            Composite::WebConfigReferences => "web-config-references",
            Composite::WebConfigRte => "web-config-rte",
            Composite::WebConfigRequest => "web-config-request",
            Composite::LandingPage => "landing-page",
            Composite::Article => "article",
        }
    }

    /// Base sets making up this composite, in declaration order.
    fn parts(self) -> &'static [&'static [&'static str]] {
        match self {
            Composite::WebConfigReferences => &[
                NAVIGATION_REFERENCES,
                FOOTER_REFERENCES,
                USER_FORM_REFERENCES,
            ],
            Composite::WebConfigRte => &[FOOTER_RTE_PATHS, USER_FORM_RTE_PATHS],
            Composite::WebConfigRequest => &[
                QUICK_LINKS_REFERENCES,
                NAVIGATION_REFERENCES,
                FOOTER_REFERENCES,
                USER_FORM_REFERENCES,
                FOOTER_RTE_PATHS,
                USER_FORM_RTE_PATHS,
            ],
            Composite::LandingPage => &[
                DYNAMIC_COMPONENT_REFERENCES,
                HERO_REFERENCES,
                TEASER_REFERENCES,
                TEXT_AND_IMAGE_REFERENCES,
                IMAGE_CARDS_REFERENCES,
                FEATURED_ARTICLES_REFERENCES,
                QUICK_LINKS_REFERENCES,
                TEXT_RTE_PATHS,
            ],
            Composite::Article => &[ARTICLE_RTE_PATHS],
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Composite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned by [`Composite::from_str`] for a name outside the table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown include composite '{0}'")]
pub struct UnknownComposite(pub String);

impl FromStr for Composite {
    type Err = UnknownComposite;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Composite::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| UnknownComposite(s.to_string()))
    }
}

/// Composed tables, indexed by `Composite as usize`.
static COMPOSITES: LazyLock<[IncludePathSet; 5]> =
    LazyLock::new(|| Composite::ALL.map(|c| IncludePathSet::concat(c.parts())));

/// Look up a composite include-path set.
pub fn composite(which: Composite) -> &'static IncludePathSet {
    &COMPOSITES[which.index()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composites_are_duplicate_free() {
        for c in Composite::ALL {
            let set = composite(c);
            let mut seen = std::collections::HashSet::new();
            for path in set {
                assert!(seen.insert(path), "{c}: duplicate path {path}");
            }
        }
    }

    #[test]
    fn table_order_matches_index() {
        for (i, c) in Composite::ALL.into_iter().enumerate() {
            assert_eq!(c.index(), i);
        }
    }

    #[test]
    fn web_config_references_follow_declaration_order() {
        let set = composite(Composite::WebConfigReferences);
        let expected: Vec<&str> = NAVIGATION_REFERENCES
            .iter()
            .chain(FOOTER_REFERENCES)
            .chain(USER_FORM_REFERENCES)
            .copied()
            .collect();
        assert_eq!(set.iter().collect::<Vec<_>>(), expected);
        assert_eq!(
            set.iter().next(),
            Some("main_navigation"),
            "navigation comes first"
        );
    }

    #[test]
    fn web_config_request_starts_with_quick_links() {
        let set = composite(Composite::WebConfigRequest);
        let first: Vec<&str> = set.iter().take(3).collect();
        assert_eq!(first, QUICK_LINKS_REFERENCES);
        assert!(set.contains("user_form.form.user_consent_text"));
        assert_eq!(
            set.len(),
            QUICK_LINKS_REFERENCES.len()
                + composite(Composite::WebConfigReferences).len()
                + composite(Composite::WebConfigRte).len()
        );
    }

    #[test]
    fn landing_page_ends_with_text_rte() {
        let set = composite(Composite::LandingPage);
        assert_eq!(set.iter().next(), Some("dynamic_component"));
        assert_eq!(set.iter().last(), Some("components.text.content"));
        assert!(set.contains("components.card_collection.cards.cta.link"));
    }

    #[test]
    fn composite_lookup_is_stable() {
        let a = composite(Composite::LandingPage);
        let b = composite(Composite::LandingPage);
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn names_roundtrip() {
        for c in Composite::ALL {
            assert_eq!(c.name().parse::<Composite>(), Ok(c));
        }
        let err = "header".parse::<Composite>().unwrap_err();
        assert_eq!(err.to_string(), "unknown include composite 'header'");
    }
}
