//! Single-attempt GET-and-decode against the Contentstack delivery API.
//!
//! Connection pooling, TLS, redirects and timeouts belong to the underlying
//! `reqwest::Client`. This layer never retries: a failed request surfaces as
//! [`BffError::Transport`] and an unreadable body as [`BffError::Decode`].

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use stackbff_shared::{AppConfig, BffError, Credentials, HttpConfig, Result};
use tracing::{debug, instrument};
use url::Url;
use uuid::Uuid;

use crate::query::QuerySpec;

/// User-Agent string for delivery requests.
const USER_AGENT: &str = concat!("stackbff/", env!("CARGO_PKG_VERSION"));

/// Delivery API client bound to one stack and base URL.
#[derive(Debug, Clone)]
pub struct DeliveryClient {
    http: Client,
    base_url: Url,
}

impl DeliveryClient {
    /// Build a client from the app config and resolved credentials.
    pub fn new(config: &AppConfig, credentials: &Credentials) -> Result<Self> {
        let base_url = config.contentstack.base_url()?;
        Self::with_base_url(base_url, credentials, &config.http)
    }

    /// Build a client against an explicit base URL.
    pub fn with_base_url(
        base_url: Url,
        credentials: &Credentials,
        http: &HttpConfig,
    ) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(default_headers(credentials)?)
            .redirect(reqwest::redirect::Policy::limited(http.max_redirects))
            .timeout(Duration::from_secs(http.timeout_secs))
            .build()
            .map_err(|e| BffError::transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Render `spec` against this client's base URL.
    pub fn url_for(&self, spec: &QuerySpec) -> Result<Url> {
        spec.to_url(&self.base_url)
    }

    /// Render and fetch `spec`, decoding the body as `T`.
    pub async fn fetch_query<T: DeserializeOwned>(&self, spec: &QuerySpec) -> Result<T> {
        let url = self.url_for(spec)?;
        self.fetch(&url).await
    }

    /// Issue one GET to `url` and decode the JSON body as `T`.
    ///
    /// Unknown JSON fields are ignored and missing ones fall back to their
    /// defaults, as far as `T` allows.
    #[instrument(skip_all, fields(request_id = %Uuid::now_v7(), url = %url))]
    pub async fn fetch<T: DeserializeOwned>(&self, url: &Url) -> Result<T> {
        debug!("fetching from delivery API");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| BffError::transport(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BffError::http_status(
                format!("{url}: HTTP {status}"),
                status.as_u16(),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| BffError::transport(format!("{url}: body read failed: {e}")))?;

        debug!(bytes = body.len(), %status, "response received");

        serde_json::from_slice(&body).map_err(|e| BffError::decode(format!("{url}: {e}")))
    }
}

/// `api_key`, `access_token` and `Content-Type` headers sent on every request.
fn default_headers(credentials: &Credentials) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        HeaderName::from_static("api_key"),
        secret_header(&credentials.api_key, "api_key")?,
    );
    headers.insert(
        HeaderName::from_static("access_token"),
        secret_header(&credentials.delivery_token, "access_token")?,
    );
    Ok(headers)
}

fn secret_header(value: &str, name: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(value)
        .map_err(|_| BffError::config(format!("{name} contains characters not allowed in a header")))?;
    value.set_sensitive(true);
    Ok(value)
}
