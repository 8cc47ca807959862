// src/config.rs

use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct HibpConfig {
    #[serde(default = "default_hibp_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,  // HIBP rejects requests without one
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_hibp_base_url() -> String {
    "https://haveibeenpwned.com/api/v3".to_string()
}
fn default_user_agent() -> String {
    concat!("breach-monitor/", env!("CARGO_PKG_VERSION")).to_string()
}
fn default_timeout_secs() -> u64 { 30 }

impl Default for HibpConfig {
    fn default() -> Self {
        Self {
            base_url: default_hibp_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HackedEmailsConfig {
    #[serde(default = "default_hacked_emails_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_hacked_emails_base_url() -> String {
    "https://hacked-emails.com/".to_string()
}

impl Default for HackedEmailsConfig {
    fn default() -> Self {
        Self {
            base_url: default_hacked_emails_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitConfig {
    /// Pause between the HIBP breach and paste lookups
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,
}

fn default_delay_secs() -> u64 { 2 }

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            delay_secs: default_delay_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String { "error".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub hibp: HibpConfig,
    #[serde(default)]
    pub hacked_emails: HackedEmailsConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&contents)?;
        Ok(cfg)
    }

    /// Load `path` if given, otherwise use built-in defaults
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path)
                .with_context(|| format!("Failed to load config file {}", path.display())),
            None => Ok(Self::default()),
        }
    }
}
