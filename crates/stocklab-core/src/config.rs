//! Application configuration
//!
//! Loaded from `~/.stocklab/config.toml` when present, then overridden by
//! environment variables. Every field has a default so an empty or missing
//! file is valid.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub a2a: A2aSettings,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub debug: bool,
}

/// Remote stock analysis agent settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct A2aSettings {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default = "default_submit_timeout")]
    pub submit_timeout_secs: u64,
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Shown to the user when the server cannot be reached
    #[serde(default = "default_start_hint")]
    pub start_hint: String,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_server_url() -> String {
    "http://localhost:8001".to_string()
}
fn default_submit_timeout() -> u64 {
    120
}
fn default_max_poll_attempts() -> u32 {
    60
}
fn default_poll_interval() -> u64 {
    1
}
fn default_start_hint() -> String {
    "start the stock analysis A2A server so that it listens on the configured address".to_string()
}

impl Default for A2aSettings {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            submit_timeout_secs: default_submit_timeout(),
            max_poll_attempts: default_max_poll_attempts(),
            poll_interval_secs: default_poll_interval(),
            start_hint: default_start_hint(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            a2a: A2aSettings::default(),
            log_level: default_log_level(),
            debug: false,
        }
    }
}

impl A2aSettings {
    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.submit_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl AppConfig {
    /// Default config file location: `~/.stocklab/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".stocklab").join("config.toml"))
    }

    /// Parse a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config TOML")
    }

    /// Load from `path`, falling back to defaults when the file does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                debug!("Loading config from {}", path.display());
                Self::from_toml(&content)
                    .with_context(|| format!("Invalid config file {}", path.display()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    /// Load the file (explicit path or default location), apply process
    /// environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::load_from(p)?,
            None => match Self::default_path() {
                Some(p) => Self::load_from(&p)?,
                None => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("A2A_SERVER_URL") {
            self.a2a.server_url = url;
        }
        if let Some(v) = lookup("A2A_SUBMIT_TIMEOUT_SECS") {
            self.a2a.submit_timeout_secs = parse_env("A2A_SUBMIT_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("A2A_MAX_POLL_ATTEMPTS") {
            self.a2a.max_poll_attempts = parse_env("A2A_MAX_POLL_ATTEMPTS", &v)?;
        }
        if let Some(v) = lookup("A2A_POLL_INTERVAL_SECS") {
            self.a2a.poll_interval_secs = parse_env("A2A_POLL_INTERVAL_SECS", &v)?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log_level = level.to_lowercase();
        }
        if let Some(v) = lookup("DEBUG") {
            self.debug = v.eq_ignore_ascii_case("true") || v == "1";
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.a2a.server_url)
            .with_context(|| format!("Invalid A2A server URL '{}'", self.a2a.server_url))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            bail!("A2A server URL must use http or https, got '{}'", url.scheme());
        }
        if self.a2a.max_poll_attempts == 0 {
            bail!("a2a.max_poll_attempts must be at least 1");
        }
        if self.a2a.submit_timeout_secs == 0 {
            bail!("a2a.submit_timeout_secs must be at least 1");
        }
        if self.a2a.poll_interval_secs == 0 {
            bail!("a2a.poll_interval_secs must be at least 1");
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("{} has invalid value '{}'", key, value))
}
