//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::{Map, Value, json};
use stackbff_core::{ContentService, EntryRequest};
use stackbff_includes::{Composite, composite};
use stackbff_model::{BlockUnion, VariantInfo, renderable};
use stackbff_shared::{AppConfig, init_config, load_config, load_config_from, resolve_credentials};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// stackbff: typed, page-ready content from a Contentstack stack.
#[derive(Parser)]
#[command(
    name = "stackbff",
    version,
    about = "Fetch page-ready Contentstack content as JSON.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.stackbff/stackbff.toml.
    #[arg(long, global = true, env = "STACKBFF_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Content type, locale and variant shared by the single-entry commands.
#[derive(Args, Debug)]
pub(crate) struct EntryTarget {
    /// Content type UID.
    pub content_type: String,

    /// Locale code (e.g. en-us).
    #[arg(short, long)]
    pub locale: Option<String>,

    /// Personalization variant.
    #[arg(long)]
    pub variant: Option<String>,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Fetch the site chrome (navigation, footer, consent, forms).
    WebConfig(EntryTarget),

    /// Fetch a landing or home page.
    Page {
        #[command(flatten)]
        target: EntryTarget,

        /// Print only the resolved kind of each block.
        #[arg(long)]
        kinds: bool,
    },

    /// Fetch personalization audiences.
    Personalize(EntryTarget),

    /// Fetch feature flags as one merged map.
    FeatureFlags {
        #[command(flatten)]
        target: EntryTarget,

        /// Print only the value of this key.
        #[arg(long)]
        key: Option<String>,
    },

    /// Query entries of any content type.
    Entries {
        /// Content type UID. Required unless given in --request.
        content_type: Option<String>,

        /// JSON request body (contentTypeUid, include, exclude, query, ...).
        #[arg(long)]
        request: Option<PathBuf>,

        #[arg(short, long)]
        locale: Option<String>,

        #[arg(long)]
        variant: Option<String>,

        /// Reference path to include (repeatable).
        #[arg(long = "include")]
        include: Vec<String>,

        /// Field to exclude (repeatable).
        #[arg(long = "exclude")]
        exclude: Vec<String>,

        /// Extra query parameter as key=value (repeatable).
        #[arg(long = "query", value_parser = parse_query_pair)]
        query: Vec<(String, String)>,

        #[arg(long)]
        skip: Option<u32>,

        #[arg(long)]
        limit: Option<u32>,
    },

    /// Look up entries published at a URL.
    EntryByUrl {
        /// Entry URL (e.g. /about).
        url: String,

        #[arg(short, long)]
        locale: Option<String>,

        #[arg(long)]
        variant: Option<String>,
    },

    /// Print a composite include-path set.
    Includes {
        /// Composite name; omit to list all names.
        composite: Option<Composite>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

fn parse_query_pair(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr; stdout carries
/// the JSON result only.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "stackbff=info",
        1 => "stackbff=debug",
        _ => "stackbff=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::WebConfig(target) => {
            let service = connect(config_path)?;
            let config = with_spinner(
                "Fetching web config",
                service.web_config(&target.content_type, target.locale(), target.variant()),
            )
            .await?;
            print_json(&config)
        }
        Command::Page { target, kinds } => {
            let service = connect(config_path)?;
            let page = with_spinner(
                "Fetching page",
                service.landing_page(&target.content_type, target.locale(), target.variant()),
            )
            .await?;
            if kinds {
                print_json(&json!({
                    "components": kind_names(page.components()),
                    "details": kind_names(page.details()),
                    "marketing": kind_names(page.marketing()),
                }))
            } else {
                print_json(&page)
            }
        }
        Command::Personalize(target) => {
            let service = connect(config_path)?;
            let config = with_spinner(
                "Fetching personalize config",
                service.personalize_config(&target.content_type, target.locale(), target.variant()),
            )
            .await?;
            print_json(&config)
        }
        Command::FeatureFlags { target, key } => {
            let service = connect(config_path)?;
            let flags = with_spinner(
                "Fetching feature flags",
                service.feature_flags(&target.content_type, target.locale(), target.variant()),
            )
            .await?;
            match key {
                Some(key) => {
                    let value = flags
                        .get(&key)
                        .ok_or_else(|| eyre!("no feature flag named '{key}'"))?;
                    print_json(value)
                }
                None => print_json(&flags),
            }
        }
        Command::Entries {
            content_type,
            request,
            locale,
            variant,
            include,
            exclude,
            query,
            skip,
            limit,
        } => {
            let mut entry_request = match request {
                Some(path) => read_request(&path)?,
                None => EntryRequest::default(),
            };
            if let Some(uid) = content_type {
                entry_request.content_type_uid = uid;
            }
            entry_request.locale = locale.or(entry_request.locale);
            entry_request.variant = variant.or(entry_request.variant);
            entry_request.include.extend(include);
            entry_request.exclude.extend(exclude);
            for (key, value) in query {
                entry_request.query.insert(key, Value::String(value));
            }
            entry_request.skip = skip.or(entry_request.skip);
            entry_request.limit = limit.or(entry_request.limit);

            let service = connect(config_path)?;
            let envelope =
                with_spinner("Fetching entries", service.entries(&entry_request)).await?;
            print_json(&envelope)
        }
        Command::EntryByUrl {
            url,
            locale,
            variant,
        } => {
            let service = connect(config_path)?;
            let envelope = with_spinner(
                "Fetching entry by url",
                service.entry_by_url(&url, locale.as_deref(), variant.as_deref()),
            )
            .await?;
            print_json(&envelope)
        }
        Command::Includes { composite: which } => cmd_includes(which),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

impl EntryTarget {
    fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_includes(which: Option<Composite>) -> Result<()> {
    match which {
        Some(which) => {
            let paths = composite(which);
            info!(composite = %which, paths = paths.len(), "include paths");
            print_json(paths)
        }
        None => {
            let names: Map<String, Value> = Composite::ALL
                .into_iter()
                .map(|c| (c.name().to_string(), json!(composite(c).len())))
                .collect();
            print_json(&names)
        }
    }
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = read_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_config(path: Option<&Path>) -> Result<AppConfig> {
    Ok(match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    })
}

/// Load config, resolve credentials and build the service.
fn connect(path: Option<&Path>) -> Result<ContentService> {
    let config = read_config(path)?;
    let credentials = resolve_credentials(&config.contentstack)?;
    info!(
        base_url = %config.contentstack.base_url,
        environment = %config.contentstack.environment,
        "connecting to delivery API"
    );
    Ok(ContentService::from_config(&config, &credentials)?)
}

fn read_request(path: &Path) -> Result<EntryRequest> {
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).wrap_err_with(|| format!("invalid request in {}", path.display()))
}

fn kind_names<B: BlockUnion>(blocks: &[B]) -> Vec<&'static str> {
    renderable(blocks).iter().map(VariantInfo::kind_name).collect()
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Run `fut` behind a stderr spinner.
async fn with_spinner<F, T>(message: &'static str, fut: F) -> Result<T>
where
    F: std::future::Future<Output = stackbff_shared::Result<T>>,
{
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")?
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));

    let result = fut.await;
    spinner.finish_and_clear();
    Ok(result?)
}
