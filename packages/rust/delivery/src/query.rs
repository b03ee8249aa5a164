//! Delivery API request construction.
//!
//! A [`QueryBuilder`] collects the request inputs, [`QueryBuilder::build`]
//! validates them into an immutable [`QuerySpec`], and
//! [`QuerySpec::to_url`] renders exactly one URL against a base URL.
//! Nothing here performs I/O.

use stackbff_includes::IncludePathSet;
use stackbff_shared::{BffError, Result};
use url::Url;

/// How include paths are spelled on the query string.
///
/// Both spellings are accepted by the same upstream API version; call sites
/// pick one per query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IncludeFlavor {
    /// Repeated `include[]=<path>`.
    #[default]
    Flat,
    /// Repeated `include[][]=<path>` (nested-reference spelling).
    Nested,
}

impl IncludeFlavor {
    pub fn param_name(self) -> &'static str {
        match self {
            IncludeFlavor::Flat => "include[]",
            IncludeFlavor::Nested => "include[][]",
        }
    }
}

/// Skip/limit passthrough. Only emitted when both halves are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub skip: u32,
    pub limit: u32,
}

impl Pagination {
    /// `Some` only when both `skip` and `limit` are present.
    pub fn from_parts(skip: Option<u32>, limit: Option<u32>) -> Option<Self> {
        match (skip, limit) {
            (Some(skip), Some(limit)) => Some(Self { skip, limit }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    /// `/content_types/{uid}/entries`
    ContentType(String),
    /// `/content_types/entries?environment=..&url=..`
    EntryUrl { url: String, environment: String },
}

/// Mutable collector for request inputs.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    target: Target,
    locale: Option<String>,
    variant: Option<String>,
    includes: IncludePathSet,
    flavor: IncludeFlavor,
    excludes: Vec<String>,
    pagination: Option<Pagination>,
    extra: Vec<(String, String)>,
}

/// Validated, immutable request description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    target: Target,
    locale: Option<String>,
    variant: Option<String>,
    includes: IncludePathSet,
    flavor: IncludeFlavor,
    excludes: Vec<String>,
    pagination: Option<Pagination>,
    extra: Vec<(String, String)>,
}

/// `None` for absent, empty or whitespace-only input.
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

impl QueryBuilder {
    fn with_target(target: Target) -> Self {
        Self {
            target,
            locale: None,
            variant: None,
            includes: IncludePathSet::new(),
            flavor: IncludeFlavor::default(),
            excludes: Vec::new(),
            pagination: None,
            extra: Vec::new(),
        }
    }

    /// Entries of one content type.
    pub fn entries(content_type_uid: impl Into<String>) -> Self {
        Self::with_target(Target::ContentType(content_type_uid.into()))
    }

    /// The entry published at `url` in `environment`.
    pub fn entry_by_url(url: impl Into<String>, environment: impl Into<String>) -> Self {
        Self::with_target(Target::EntryUrl {
            url: url.into(),
            environment: environment.into(),
        })
    }

    /// Locale code; blank means the upstream default locale.
    pub fn locale(mut self, locale: Option<&str>) -> Self {
        self.locale = non_blank(locale);
        self
    }

    /// Personalization variant; blank means none.
    pub fn variant(mut self, variant: Option<&str>) -> Self {
        self.variant = non_blank(variant);
        self
    }

    /// Add include paths, keeping set order and dropping duplicates.
    pub fn includes(mut self, includes: &IncludePathSet) -> Self {
        self.includes.merge(includes);
        self
    }

    pub fn include_flavor(mut self, flavor: IncludeFlavor) -> Self {
        self.flavor = flavor;
        self
    }

    /// Add `exclude[]` field names.
    pub fn excludes<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn pagination(mut self, pagination: Option<Pagination>) -> Self {
        self.pagination = pagination;
        self
    }

    /// Append an extra query parameter, emitted after everything else.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    /// Validate and freeze the request.
    pub fn build(self) -> Result<QuerySpec> {
        match &self.target {
            Target::ContentType(uid) if uid.trim().is_empty() => {
                return Err(BffError::invalid_argument("content type uid is required"));
            }
            Target::EntryUrl { url, .. } if url.trim().is_empty() => {
                return Err(BffError::invalid_argument("entry url is required"));
            }
            _ => {}
        }

        Ok(QuerySpec {
            target: self.target,
            locale: self.locale,
            variant: self.variant,
            includes: self.includes,
            flavor: self.flavor,
            excludes: self.excludes,
            pagination: self.pagination,
            extra: self.extra,
        })
    }
}

impl QuerySpec {
    /// Content type uid, for content-type targets.
    pub fn content_type_uid(&self) -> Option<&str> {
        match &self.target {
            Target::ContentType(uid) => Some(uid),
            Target::EntryUrl { .. } => None,
        }
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    pub fn includes(&self) -> &IncludePathSet {
        &self.includes
    }

    /// Query parameters in emission order.
    pub fn query_pairs(&self) -> Vec<(&str, String)> {
        let mut pairs: Vec<(&str, String)> = Vec::new();

        if let Target::EntryUrl { url, environment } = &self.target {
            pairs.push(("environment", environment.clone()));
            pairs.push(("url", url.clone()));
        }
        if let Some(locale) = &self.locale {
            pairs.push(("locale", locale.clone()));
        }
        if let Some(variant) = &self.variant {
            pairs.push(("variant", variant.clone()));
        }
        let include_key = self.flavor.param_name();
        for path in &self.includes {
            pairs.push((include_key, path.to_string()));
        }
        for field in &self.excludes {
            pairs.push(("exclude[]", field.clone()));
        }
        if let Some(page) = self.pagination {
            pairs.push(("skip", page.skip.to_string()));
            pairs.push(("limit", page.limit.to_string()));
        }
        for (key, value) in &self.extra {
            pairs.push((key.as_str(), value.clone()));
        }

        pairs
    }

    /// Render the request URL against `base` (e.g. `https://api.contentstack.io/v3`).
    pub fn to_url(&self, base: &Url) -> Result<Url> {
        let mut url = base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                BffError::config(format!("base url '{base}' cannot carry a path"))
            })?;
            segments.pop_if_empty();
            match &self.target {
                Target::ContentType(uid) => {
                    segments.extend(["content_types", uid.as_str(), "entries"]);
                }
                Target::EntryUrl { .. } => {
                    segments.extend(["content_types", "entries"]);
                }
            }
        }

        let pairs = self.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://api.contentstack.io/v3").unwrap()
    }

    fn pairs(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    fn includes(paths: &[&str]) -> IncludePathSet {
        paths.iter().copied().collect()
    }

    #[test]
    fn builds_content_type_entries_url() {
        let spec = QueryBuilder::entries("home_page")
            .locale(Some("en"))
            .variant(None)
            .includes(&includes(&["a", "b"]))
            .build()
            .unwrap();
        let url = spec.to_url(&base()).unwrap();

        assert_eq!(url.path(), "/v3/content_types/home_page/entries");
        assert_eq!(
            pairs(&url),
            vec![
                ("locale".to_string(), "en".to_string()),
                ("include[]".to_string(), "a".to_string()),
                ("include[]".to_string(), "b".to_string()),
            ]
        );
        assert!(!url.as_str().contains("variant"));
    }

    #[test]
    fn nested_flavor_repeats_double_brackets() {
        let spec = QueryBuilder::entries("web_config")
            .include_flavor(IncludeFlavor::Nested)
            .includes(&includes(&["quick_links", "quick_links.items"]))
            .build()
            .unwrap();
        let url = spec.to_url(&base()).unwrap();
        let keys: Vec<String> = pairs(&url).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["include[][]", "include[][]"]);
    }

    #[test]
    fn blank_content_type_is_rejected() {
        for uid in ["", "   "] {
            let err = QueryBuilder::entries(uid).build().unwrap_err();
            assert!(matches!(err, BffError::InvalidArgument { .. }), "{uid:?}");
        }
    }

    #[test]
    fn blank_locale_and_variant_are_omitted() {
        let spec = QueryBuilder::entries("page")
            .locale(Some(""))
            .variant(Some("  "))
            .build()
            .unwrap();
        let url = spec.to_url(&base()).unwrap();
        assert_eq!(url.query(), None);
        assert_eq!(url.as_str(), "https://api.contentstack.io/v3/content_types/page/entries");
    }

    #[test]
    fn variant_is_emitted_after_locale() {
        let spec = QueryBuilder::entries("page")
            .locale(Some("en-us"))
            .variant(Some("cs_personalize_0_1"))
            .build()
            .unwrap();
        let url = spec.to_url(&base()).unwrap();
        assert_eq!(
            pairs(&url),
            vec![
                ("locale".to_string(), "en-us".to_string()),
                ("variant".to_string(), "cs_personalize_0_1".to_string()),
            ]
        );
    }

    #[test]
    fn pagination_requires_both_halves() {
        assert_eq!(Pagination::from_parts(Some(10), None), None);
        assert_eq!(Pagination::from_parts(None, Some(5)), None);

        let spec = QueryBuilder::entries("blog_post")
            .pagination(Pagination::from_parts(Some(20), Some(10)))
            .param("include_count", "true")
            .build()
            .unwrap();
        let url = spec.to_url(&base()).unwrap();
        assert_eq!(
            pairs(&url),
            vec![
                ("skip".to_string(), "20".to_string()),
                ("limit".to_string(), "10".to_string()),
                ("include_count".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn excludes_follow_includes() {
        let spec = QueryBuilder::entries("page")
            .includes(&includes(&["hero"]))
            .excludes(["seo", "taxonomies"])
            .build()
            .unwrap();
        let keys: Vec<&str> = spec.query_pairs().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["include[]", "exclude[]", "exclude[]"]);
    }

    #[test]
    fn content_type_uid_is_one_path_segment() {
        let spec = QueryBuilder::entries("odd/uid").build().unwrap();
        let url = spec.to_url(&base()).unwrap();
        assert_eq!(url.path(), "/v3/content_types/odd%2Fuid/entries");
    }

    #[test]
    fn trailing_slash_on_base_is_tolerated() {
        let base = Url::parse("https://cdn.example.com/v3/").unwrap();
        let spec = QueryBuilder::entries("page").build().unwrap();
        assert_eq!(
            spec.to_url(&base).unwrap().path(),
            "/v3/content_types/page/entries"
        );
    }

    #[test]
    fn entry_by_url_carries_environment_and_url() {
        let spec = QueryBuilder::entry_by_url("/about-us", "production")
            .locale(Some("en-us"))
            .build()
            .unwrap();
        assert_eq!(spec.content_type_uid(), None);

        let url = spec.to_url(&base()).unwrap();
        assert_eq!(url.path(), "/v3/content_types/entries");
        assert_eq!(
            pairs(&url),
            vec![
                ("environment".to_string(), "production".to_string()),
                ("url".to_string(), "/about-us".to_string()),
                ("locale".to_string(), "en-us".to_string()),
            ]
        );
    }

    #[test]
    fn entry_by_url_requires_url() {
        let err = QueryBuilder::entry_by_url(" ", "production")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("entry url is required"));
    }
}
