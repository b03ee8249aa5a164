//! Page-level content operations over one delivery client.

use serde::de::DeserializeOwned;
use stackbff_delivery::{DeliveryClient, Envelope, IncludeFlavor, QueryBuilder, QuerySpec};
use stackbff_includes::{Composite, composite};
use stackbff_model::{Entry, FeatureFlagConfig, PageEntry, PersonalizeConfig, WebConfig};
use stackbff_shared::{AppConfig, Credentials, Result};
use tracing::{error, info, instrument};

use crate::request::EntryRequest;

/// Content operations for one stack and publishing environment.
///
/// Stateless apart from the shared HTTP client; cheap to clone and safe to
/// call concurrently.
#[derive(Debug, Clone)]
pub struct ContentService {
    client: DeliveryClient,
    environment: String,
}

impl ContentService {
    pub fn new(client: DeliveryClient, environment: impl Into<String>) -> Self {
        Self {
            client,
            environment: environment.into(),
        }
    }

    /// Build the delivery client from config and wrap it.
    pub fn from_config(config: &AppConfig, credentials: &Credentials) -> Result<Self> {
        let client = DeliveryClient::new(config, credentials)?;
        Ok(Self::new(client, config.contentstack.environment.clone()))
    }

    pub fn client(&self) -> &DeliveryClient {
        &self.client
    }

    /// Publishing environment sent with entry-by-URL lookups.
    pub fn environment(&self) -> &str {
        &self.environment
    }

    // -----------------------------------------------------------------------
    // Single-entry operations
    // -----------------------------------------------------------------------

    /// Site chrome: navigation, footer, consent modal and user forms.
    ///
    /// Uses nested `include[][]` parameters with every quick-link,
    /// reference and RTE path the chrome renders.
    #[instrument(skip_all, fields(content_type = %content_type_uid, locale = ?locale, variant = ?variant))]
    pub async fn web_config(
        &self,
        content_type_uid: &str,
        locale: Option<&str>,
        variant: Option<&str>,
    ) -> Result<WebConfig> {
        info!("fetching web config");
        let spec = QueryBuilder::entries(content_type_uid)
            .locale(locale)
            .variant(variant)
            .include_flavor(IncludeFlavor::Nested)
            .includes(composite(Composite::WebConfigRequest))
            .build();
        logged("web config", self.first_entry(spec).await)
    }

    /// Landing or home page with its hero, blocks and their references.
    #[instrument(skip_all, fields(content_type = %content_type_uid, locale = ?locale, variant = ?variant))]
    pub async fn landing_page(
        &self,
        content_type_uid: &str,
        locale: Option<&str>,
        variant: Option<&str>,
    ) -> Result<PageEntry> {
        info!("fetching landing page");
        let spec = QueryBuilder::entries(content_type_uid)
            .locale(locale)
            .variant(variant)
            .includes(composite(Composite::LandingPage))
            .build();
        logged("landing page", self.first_entry(spec).await)
    }

    #[instrument(skip_all, fields(content_type = %content_type_uid, locale = ?locale, variant = ?variant))]
    pub async fn personalize_config(
        &self,
        content_type_uid: &str,
        locale: Option<&str>,
        variant: Option<&str>,
    ) -> Result<PersonalizeConfig> {
        info!("fetching personalize config");
        let spec = QueryBuilder::entries(content_type_uid)
            .locale(locale)
            .variant(variant)
            .build();
        logged("personalize config", self.first_entry(spec).await)
    }

    /// Feature-flag entry. Its merged view is computed lazily on first read.
    #[instrument(skip_all, fields(content_type = %content_type_uid, locale = ?locale, variant = ?variant))]
    pub async fn feature_flags(
        &self,
        content_type_uid: &str,
        locale: Option<&str>,
        variant: Option<&str>,
    ) -> Result<FeatureFlagConfig> {
        info!("fetching feature flags");
        let spec = QueryBuilder::entries(content_type_uid)
            .locale(locale)
            .variant(variant)
            .build();
        logged("feature flags", self.first_entry(spec).await)
    }

    // -----------------------------------------------------------------------
    // Envelope operations
    // -----------------------------------------------------------------------

    /// Generic entries query; returns the whole envelope.
    #[instrument(skip_all, fields(content_type = %request.content_type_uid))]
    pub async fn entries(&self, request: &EntryRequest) -> Result<Envelope<Entry>> {
        info!(
            locale = ?request.locale,
            variant = ?request.variant,
            "fetching entries"
        );
        let envelope: Envelope<Entry> = logged("entries", self.envelope(request.to_query()).await)?;
        info!(count = envelope.count.unwrap_or(0), "fetched entries");
        Ok(envelope)
    }

    /// Entries published at `url` in the configured environment.
    #[instrument(skip_all, fields(url = %url, locale = ?locale, variant = ?variant))]
    pub async fn entry_by_url(
        &self,
        url: &str,
        locale: Option<&str>,
        variant: Option<&str>,
    ) -> Result<Envelope<Entry>> {
        info!(environment = %self.environment, "fetching entry by url");
        let spec = QueryBuilder::entry_by_url(url, &self.environment)
            .locale(locale)
            .variant(variant)
            .build();
        let envelope: Envelope<Entry> = logged("entry by url", self.envelope(spec).await)?;
        info!(entries = envelope.len(), "fetched entry by url");
        Ok(envelope)
    }

    async fn envelope<T: DeserializeOwned>(&self, spec: Result<QuerySpec>) -> Result<Envelope<T>> {
        self.client.fetch_query(&spec?).await
    }

    /// Fetch `spec` and keep only its first entry.
    async fn first_entry<T: DeserializeOwned>(&self, spec: Result<QuerySpec>) -> Result<T> {
        let spec = spec?;
        let context = spec.content_type_uid().unwrap_or("entries");
        let envelope: Envelope<T> = self.client.fetch_query(&spec).await?;
        envelope.select_first(context)
    }
}

fn logged<T>(what: &str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        error!(error = %e, "error fetching {what}");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stackbff_model::{BlockKind, ConfigValue};
    use stackbff_shared::{BffError, HttpConfig};
    use url::Url;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn service_for(server: &MockServer) -> ContentService {
        let base = Url::parse(&format!("{}/v3", server.uri())).unwrap();
        let client = DeliveryClient::with_base_url(
            base,
            &Credentials::new("api-key", "token"),
            &HttpConfig::default(),
        )
        .unwrap();
        ContentService::new(client, "staging")
    }

    fn entries(body: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(body)
    }

    #[tokio::test]
    async fn web_config_uses_nested_includes_and_first_entry() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v3/content_types/web_config/entries"))
            .and(query_param("locale", "en-us"))
            .and(query_param("variant", "v1"))
            .and(query_param("include[][]", "main_navigation"))
            .and(query_param("include[][]", "footer_navigation.copyright_info"))
            .respond_with(entries(json!({
                "entries": [{ "uid": "first", "title": "Site" }, { "uid": "second" }],
                "count": 2
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = service_for(&server)
            .await
            .web_config("web_config", Some("en-us"), Some("v1"))
            .await
            .unwrap();
        assert_eq!(config.uid.as_deref(), Some("first"));
        assert_eq!(config.title.as_deref(), Some("Site"));
    }

    #[tokio::test]
    async fn landing_page_resolves_blocks() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v3/content_types/landing_page/entries"))
            .and(query_param("include[]", "hero.cta.link"))
            .and(query_param_is_missing("include[][]"))
            .respond_with(entries(json!({
                "entries": [{
                    "url": "/",
                    "components": [
                        { "teaser": { "heading": "Hi" } },
                        { "unexpected": {} }
                    ]
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = service_for(&server)
            .await
            .landing_page("landing_page", None, None)
            .await
            .unwrap();
        let kinds: Vec<_> = page.components().iter().map(|b| b.variant().kind()).collect();
        assert_eq!(kinds, [BlockKind::Teaser, BlockKind::Unknown]);
    }

    #[tokio::test]
    async fn empty_envelope_is_empty_result() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(entries(json!({ "entries": [], "count": 0 })))
            .mount(&server)
            .await;

        let err = service_for(&server)
            .await
            .personalize_config("personalize_config", Some("en-us"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, BffError::EmptyResult { ref context } if context == "personalize_config"));
    }

    #[tokio::test]
    async fn feature_flags_expose_merged_config() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v3/content_types/feature_flags/entries"))
            .respond_with(entries(json!({
                "entries": [{
                    "boolean_config": [{ "key": "dark_mode", "value": true }],
                    "strings_configs": [{ "key": "dark_mode", "value": "off" }],
                    "numbers_config": [{ "key": "max_items", "value": "10" }]
                }]
            })))
            .mount(&server)
            .await;

        let flags = service_for(&server)
            .await
            .feature_flags("feature_flags", None, None)
            .await
            .unwrap();
        assert_eq!(flags.get("dark_mode"), Some(&ConfigValue::Text("off".into())));
        assert_eq!(
            serde_json::to_value(&flags).unwrap(),
            json!({ "mergedConfig": { "dark_mode": "off", "max_items": "10" } })
        );
    }

    #[tokio::test]
    async fn feature_flags_keep_loose_upstream_scalars() {
        let server = MockServer::start().await;

        let body = r#"{"entries": [{
            "boolean_config": [{"key": "checkout_v2", "value": "true"}],
            "numbers_config": [
                {"key": "price", "value": 1.50},
                {"key": "wide", "value": 12345678901234567890123}
            ],
            "strings_configs": [{"key": "retries", "value": 5}],
            "string_lists": [{"key": "regions", "values": ["eu", null]}]
        }]}"#;
        Mock::given(method("GET"))
            .and(path("/v3/content_types/feature_flags/entries"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
            .mount(&server)
            .await;

        let flags = service_for(&server)
            .await
            .feature_flags("feature_flags", None, None)
            .await
            .unwrap();
        assert_eq!(
            serde_json::to_value(&flags).unwrap(),
            json!({ "mergedConfig": {
                "checkout_v2": true,
                "price": "1.50",
                "wide": "12345678901234567890123",
                "retries": "5",
                "regions": ["eu"]
            } })
        );
    }

    /// Payload type without `Default`, as most entry models are.
    #[derive(Debug, serde::Deserialize)]
    struct Headline {
        title: String,
    }

    #[tokio::test]
    async fn any_deserializable_payload_decodes() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v3/content_types/article/entries"))
            .respond_with(entries(json!({
                "entries": [{ "title": "First" }, { "title": "Second" }],
                "count": 2
            })))
            .mount(&server)
            .await;

        let service = service_for(&server).await;
        let first: Headline = service
            .first_entry(QueryBuilder::entries("article").build())
            .await
            .unwrap();
        assert_eq!(first.title, "First");

        let envelope: Envelope<Headline> = service
            .envelope(QueryBuilder::entries("article").build())
            .await
            .unwrap();
        assert_eq!(envelope.len(), 2);
    }

    #[tokio::test]
    async fn upstream_failure_propagates_as_transport() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = service_for(&server)
            .await
            .web_config("web_config", None, None)
            .await
            .unwrap_err();
        assert_eq!(err.upstream_status(), Some(500));
    }

    #[tokio::test]
    async fn blank_content_type_never_reaches_upstream() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(entries(json!({ "entries": [{}] })))
            .expect(0)
            .mount(&server)
            .await;

        let service = service_for(&server).await;
        let err = service.landing_page(" ", None, None).await.unwrap_err();
        assert!(matches!(err, BffError::InvalidArgument { .. }));

        let err = service.entries(&EntryRequest::default()).await.unwrap_err();
        assert!(matches!(err, BffError::InvalidArgument { .. }));
    }

    #[tokio::test]
    async fn entries_returns_whole_envelope() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v3/content_types/article/entries"))
            .and(query_param("include[]", "author"))
            .and(query_param("exclude[]", "seo"))
            .and(query_param("skip", "0"))
            .and(query_param("limit", "2"))
            .respond_with(entries(json!({
                "entries": [
                    { "uid": "a1", "title": "One", "body": "..." },
                    { "uid": "a2", "title": "Two" }
                ],
                "count": 14
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut request = EntryRequest::new("article");
        request.include = ["author"].into_iter().collect();
        request.exclude = vec!["seo".into()];
        request.skip = Some(0);
        request.limit = Some(2);

        let envelope = service_for(&server).await.entries(&request).await.unwrap();
        assert_eq!(envelope.count, Some(14));
        assert_eq!(envelope.len(), 2);
        let first = &envelope.entries.as_ref().unwrap()[0];
        assert_eq!(first.field("body"), Some(&json!("...")));
    }

    #[tokio::test]
    async fn entry_by_url_sends_environment() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v3/content_types/entries"))
            .and(query_param("environment", "staging"))
            .and(query_param("url", "/about us"))
            .and(query_param("locale", "fr-fr"))
            .respond_with(entries(json!({ "entries": [{ "uid": "about", "url": "/about us" }] })))
            .expect(1)
            .mount(&server)
            .await;

        let envelope = service_for(&server)
            .await
            .entry_by_url("/about us", Some("fr-fr"), None)
            .await
            .unwrap();
        assert_eq!(envelope.len(), 1);
    }

    #[tokio::test]
    async fn blank_url_is_invalid_argument() {
        let server = MockServer::start().await;
        let err = service_for(&server)
            .await
            .entry_by_url("", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, BffError::InvalidArgument { .. }));
    }
}
