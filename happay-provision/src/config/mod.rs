//! Runtime configuration
//!
//! Values come from an optional TOML file and are overridden by environment
//! variables (a `.env` file in the working directory is loaded first):
//!
//! | Key             | Environment variable   | Default |
//! |-----------------|------------------------|---------|
//! | `api_token`     | `HAPPAY_API_TOKEN`     | none, required for live runs |
//! | `endpoint`      | `HAPPAY_API_URL`       | [`DEFAULT_ENDPOINT`] |
//! | `email_domain`  | `HAPPAY_EMAIL_DOMAIN`  | `happay.in` |
//! | `timeout_secs`  | `HAPPAY_TIMEOUT_SECS`  | none (transport default) |

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::mapping::DEFAULT_EMAIL_DOMAIN;

pub const DEFAULT_ENDPOINT: &str = "https://api-v2.happay.in/auth/v1/cards/add_user/";

pub const TOKEN_ENV: &str = "HAPPAY_API_TOKEN";
pub const ENDPOINT_ENV: &str = "HAPPAY_API_URL";
pub const EMAIL_DOMAIN_ENV: &str = "HAPPAY_EMAIL_DOMAIN";
pub const TIMEOUT_ENV: &str = "HAPPAY_TIMEOUT_SECS";

/// Shape of `config.toml`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub api_token: Option<String>,
    pub endpoint: Option<String>,
    pub email_domain: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Clone)]
pub struct Config {
    pub api_token: Option<String>,
    pub endpoint: String,
    pub email_domain: String,
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("email_domain", &self.email_domain)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_token: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            email_domain: DEFAULT_EMAIL_DOMAIN.to_string(),
            timeout: None,
        }
    }
}

impl Config {
    /// Default config file location (`~/.config/happay-provision/config.toml` on Linux)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("happay-provision").join("config.toml"))
    }

    /// Load from file and process environment
    ///
    /// An explicit path must exist; the default location is optional.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let file = match explicit_path {
            Some(path) => Self::read_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::read_file(&path)?,
                _ => FileConfig::default(),
            },
        };

        Self::from_sources(file, |key| std::env::var(key).ok())
    }

    fn read_file(path: &Path) -> Result<FileConfig> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Merge file values with an environment lookup; environment wins
    pub fn from_sources<F>(file: FileConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let timeout_secs = match env(TIMEOUT_ENV) {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("{} must be a whole number of seconds", TIMEOUT_ENV))?,
            ),
            None => file.timeout_secs,
        };

        Ok(Self {
            api_token: env(TOKEN_ENV).or(file.api_token),
            endpoint: env(ENDPOINT_ENV)
                .or(file.endpoint)
                .unwrap_or(defaults.endpoint),
            email_domain: env(EMAIL_DOMAIN_ENV)
                .or(file.email_domain)
                .unwrap_or(defaults.email_domain),
            timeout: timeout_secs.filter(|s| *s > 0).map(Duration::from_secs),
        })
    }

    /// The bearer token, or an error telling the user where to set it
    pub fn require_token(&self) -> Result<&str> {
        match self.api_token.as_deref() {
            Some(token) if !token.trim().is_empty() => Ok(token),
            _ => anyhow::bail!(
                "No API token configured. Set {} (or api_token in the config file).",
                TOKEN_ENV
            ),
        }
    }
}
