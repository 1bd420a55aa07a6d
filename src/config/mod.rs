//! Configuration management.
//!
//! Configuration is read from a TOML file, then overridden by environment
//! variables prefixed with `BIBTEX_SEARCH_` (nested keys joined with `__`).
//!
//! ```toml
//! [http]
//! user_agent = "Mozilla/5.0 ..."
//! timeout_secs = 30
//!
//! [endpoints]
//! acm = "https://dl.acm.org"
//! google_scholar = "https://scholar.google.com"
//! ieee = "https://ieeexplore.ieee.org"
//!
//! [ieee]
//! session_cookie = "JSESSIONID=..."
//!
//! [cli]
//! max_articles = 10
//! default_source = "ACM"
//! copy_to_clipboard = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::SourceKind;
use crate::sources::{
    ACM_BASE_URL, GOOGLE_SCHOLAR_BASE_URL, IEEE_BASE_URL, IEEE_DEFAULT_SESSION_COOKIE,
};
use crate::utils::DEFAULT_USER_AGENT;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "BIBTEX_SEARCH";

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "bibtex-search.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub endpoints: EndpointsConfig,

    #[serde(default)]
    pub ieee: IeeeConfig,

    #[serde(default)]
    pub cli: CliConfig,
}

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout; unset keeps the HTTP client's defaults
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: None,
        }
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Base URLs for each source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_acm")]
    pub acm: String,

    #[serde(default = "default_google_scholar")]
    pub google_scholar: String,

    #[serde(default = "default_ieee")]
    pub ieee: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            acm: default_acm(),
            google_scholar: default_google_scholar(),
            ieee: default_ieee(),
        }
    }
}

fn default_acm() -> String {
    ACM_BASE_URL.to_string()
}

fn default_google_scholar() -> String {
    GOOGLE_SCHOLAR_BASE_URL.to_string()
}

fn default_ieee() -> String {
    IEEE_BASE_URL.to_string()
}

/// IEEE Xplore settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IeeeConfig {
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
}

impl Default for IeeeConfig {
    fn default() -> Self {
        Self {
            session_cookie: default_session_cookie(),
        }
    }
}

fn default_session_cookie() -> String {
    IEEE_DEFAULT_SESSION_COOKIE.to_string()
}

/// Command-line front end settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// How many search results are offered in the picker
    #[serde(default = "default_max_articles")]
    pub max_articles: usize,

    #[serde(default)]
    pub default_source: SourceKind,

    #[serde(default = "default_true")]
    pub copy_to_clipboard: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            max_articles: default_max_articles(),
            default_source: SourceKind::default(),
            copy_to_clipboard: true,
        }
    }
}

fn default_max_articles() -> usize {
    10
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Render as TOML, e.g. to seed a config file
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Load configuration from an optional file plus environment overrides
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

/// Find a config file in the user config directory or the working directory
pub fn find_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|dir| dir.join("bibtex-search").join("config.toml"));

    user_config
        .into_iter()
        .chain(std::iter::once(PathBuf::from(LOCAL_CONFIG_FILE)))
        .find(|path| path.is_file())
}
