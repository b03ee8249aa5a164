//! Application configuration for stackbff.
//!
//! User config lives at `~/.stackbff/stackbff.toml`.
//! Values missing from the file fall back to defaults; `--config` (or
//! `STACKBFF_CONFIG`) points the CLI at another file.
//! Delivery secrets never live in the file: it only names the environment
//! variables that hold them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{BffError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "stackbff.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".stackbff";

/// Default Contentstack delivery API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.contentstack.io/v3";

/// Default publishing environment.
pub const DEFAULT_ENVIRONMENT: &str = "production";

// ---------------------------------------------------------------------------
// Config structs (matching stackbff.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Delivery API settings.
    #[serde(default)]
    pub contentstack: ContentstackConfig,

    /// HTTP transport settings.
    #[serde(default)]
    pub http: HttpConfig,
}

/// `[contentstack]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentstackConfig {
    /// Delivery API base URL, including the version segment.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Publishing environment used for entry-by-URL lookups.
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Stack region. Informational; the base URL decides where requests go.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Name of the env var holding the stack API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Name of the env var holding the delivery token.
    #[serde(default = "default_delivery_token_env")]
    pub delivery_token_env: String,
}

impl Default for ContentstackConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            environment: default_environment(),
            region: None,
            api_key_env: default_api_key_env(),
            delivery_token_env: default_delivery_token_env(),
        }
    }
}

impl ContentstackConfig {
    /// Parse the configured base URL.
    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            BffError::config(format!("invalid base_url '{}': {e}", self.base_url))
        })?;
        if url.cannot_be_a_base() {
            return Err(BffError::config(format!(
                "base_url '{}' cannot carry a path",
                self.base_url
            )));
        }
        Ok(url)
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_environment() -> String {
    DEFAULT_ENVIRONMENT.into()
}
fn default_api_key_env() -> String {
    "CONTENTSTACK_API_KEY".into()
}
fn default_delivery_token_env() -> String {
    "CONTENTSTACK_DELIVERY_TOKEN".into()
}

/// `[http]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum redirects to follow.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_redirects: default_max_redirects(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}
fn default_max_redirects() -> usize {
    5
}

// ---------------------------------------------------------------------------
// Credentials (runtime, resolved from the environment)
// ---------------------------------------------------------------------------

/// Stack credentials sent as `api_key` / `access_token` headers.
#[derive(Clone)]
pub struct Credentials {
    /// Stack API key.
    pub api_key: String,
    /// Delivery token for the environment.
    pub delivery_token: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, delivery_token: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            delivery_token: delivery_token.into(),
        }
    }
}

// Keep tokens out of debug logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("delivery_token", &"<redacted>")
            .finish()
    }
}

/// Read the API key and delivery token from the env vars named in `config`.
pub fn resolve_credentials(config: &ContentstackConfig) -> Result<Credentials> {
    let api_key = read_secret(&config.api_key_env, "API key")?;
    let delivery_token = read_secret(&config.delivery_token_env, "delivery token")?;
    Ok(Credentials {
        api_key,
        delivery_token,
    })
}

fn read_secret(var_name: &str, what: &str) -> Result<String> {
    match std::env::var(var_name) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => Err(BffError::config(format!(
            "Contentstack {what} not found. Set the {var_name} environment variable."
        ))),
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.stackbff/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| BffError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.stackbff/stackbff.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BffError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| BffError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| BffError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content = toml::to_string_pretty(&config).map_err(|e| BffError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| BffError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("base_url"));
        assert!(toml_str.contains("CONTENTSTACK_DELIVERY_TOKEN"));
        assert!(!toml_str.contains("region"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.contentstack.base_url, DEFAULT_BASE_URL);
        assert_eq!(parsed.contentstack.environment, DEFAULT_ENVIRONMENT);
        assert_eq!(parsed.http.timeout_secs, 30);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[contentstack]
base_url = "https://eu-cdn.contentstack.com/v3"
region = "eu"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(
            config.contentstack.base_url,
            "https://eu-cdn.contentstack.com/v3"
        );
        assert_eq!(config.contentstack.region.as_deref(), Some("eu"));
        assert_eq!(config.contentstack.environment, "production");
        assert_eq!(config.http.max_redirects, 5);
    }

    #[test]
    fn base_url_must_be_hierarchical() {
        let mut config = ContentstackConfig::default();
        assert!(config.base_url().is_ok());

        config.base_url = "mailto:someone@example.com".into();
        assert!(config.base_url().is_err());

        config.base_url = "not a url".into();
        let err = config.base_url().unwrap_err();
        assert!(err.to_string().contains("invalid base_url"));
    }

    #[test]
    fn missing_credentials_are_a_config_error() {
        let config = ContentstackConfig {
            // Unique names so no real environment can satisfy them
            api_key_env: "STACKBFF_TEST_NONEXISTENT_KEY_12345".into(),
            delivery_token_env: "STACKBFF_TEST_NONEXISTENT_TOKEN_12345".into(),
            ..ContentstackConfig::default()
        };
        let err = resolve_credentials(&config).unwrap_err();
        assert!(matches!(err, BffError::Config { .. }));
        assert!(err.to_string().contains("STACKBFF_TEST_NONEXISTENT_KEY_12345"));
    }

    #[test]
    fn credentials_debug_is_redacted() {
        let creds = Credentials::new("blt-secret-key", "cs-secret-token");
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
