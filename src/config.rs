//! Service configuration.
//!
//! Credentials and endpoints are externally supplied — environment variables
//! (a `.env` file is honored) layered over an optional TOML file named by
//! `CERS_CONFIG`. The API token and form id are required and intentionally
//! have no defaults: secrets never live in source.

use serde::Deserialize;
use std::fmt;

// ---------------------------------------------------------------------------
// Environment variable names
// ---------------------------------------------------------------------------

pub const ENV_API_TOKEN: &str = "KOBO_API_TOKEN";
pub const ENV_FORM_ID: &str = "KOBO_FORM_ID";
pub const ENV_BASE_URL: &str = "KOBO_BASE_URL";
pub const ENV_BIND_ADDR: &str = "CERS_BIND_ADDR";
pub const ENV_CONFIG_FILE: &str = "CERS_CONFIG";

/// KoboToolbox v2 API root used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "https://kf.kobotoolbox.org/api/v2";

/// Dashboard bind address used when no override is configured.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// KoboToolbox API token, sent as `Authorization: Token <token>`.
    pub api_token: String,
    /// Asset uid of the survey form to report on.
    pub form_id: String,
    /// API root, e.g. `https://kf.kobotoolbox.org/api/v2`.
    pub base_url: String,
    /// Address the dashboard listens on, e.g. `127.0.0.1:8080`.
    pub bind_addr: String,
}

/// TOML file shape. Every field is optional; env vars win over the file.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    api_token: Option<String>,
    form_id: Option<String>,
    base_url: Option<String>,
    bind_addr: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting was supplied by neither env nor file.
    Missing(&'static str),
    /// The config file could not be read.
    FileRead(String),
    /// The config file is not valid TOML.
    FileParse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(var) => {
                write!(f, "missing required configuration: set {}", var)
            }
            ConfigError::FileRead(msg) => write!(f, "failed to read config file: {}", msg),
            ConfigError::FileParse(msg) => write!(f, "failed to parse config file: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from the process environment, layered over the
    /// TOML file named by `CERS_CONFIG` when that variable is set.
    ///
    /// Precedence: environment variable, then file value, then default.
    /// `KOBO_API_TOKEN` and `KOBO_FORM_ID` have no default and cause a
    /// startup error when absent.
    pub fn load() -> Result<Config, ConfigError> {
        let file = match std::env::var(ENV_CONFIG_FILE) {
            Ok(path) => {
                let text = std::fs::read_to_string(&path)
                    .map_err(|e| ConfigError::FileRead(format!("{}: {}", path, e)))?;
                Self::parse_file(&text)?
            }
            Err(_) => FileConfig::default(),
        };
        Self::resolve(file, |var| std::env::var(var).ok())
    }

    fn parse_file(text: &str) -> Result<FileConfig, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::FileParse(e.to_string()))
    }

    /// Merge env lookups over file values. Split out from [`Config::load`]
    /// so tests can inject an environment instead of mutating the real one.
    fn resolve(
        file: FileConfig,
        env: impl Fn(&'static str) -> Option<String>,
    ) -> Result<Config, ConfigError> {
        let api_token = env(ENV_API_TOKEN)
            .or(file.api_token)
            .ok_or(ConfigError::Missing(ENV_API_TOKEN))?;
        let form_id = env(ENV_FORM_ID)
            .or(file.form_id)
            .ok_or(ConfigError::Missing(ENV_FORM_ID))?;
        let base_url = env(ENV_BASE_URL)
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let bind_addr = env(ENV_BIND_ADDR)
            .or(file.bind_addr)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        Ok(Config {
            api_token,
            form_id,
            // A trailing slash would produce `//` in request URLs.
            base_url: base_url.trim_end_matches('/').to_string(),
            bind_addr,
        })
    }
}
