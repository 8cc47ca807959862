// src/cli.rs
use clap::Parser;
use std::path::PathBuf;

/// Default environment variable holding the HIBP API key
pub const DEFAULT_KEY_ENV: &str = "HIBP_API_KEY";

/// breach-monitor: look up an email address on haveibeenpwned.com and hacked-emails.com
///
/// Prints the breaches and pastes the address appears in, optionally
/// limited to records released after a given date.
#[derive(Parser, Debug, Clone)]
#[command(name = "breach-monitor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The email address to look up
    #[arg(value_name = "EMAIL")]
    pub email: String,

    // ===== Filtering =====
    /// Only print breaches released after the given date
    /// (e.g. "2021-01-01", "2021-06", "yesterday", "3 weeks ago")
    #[arg(short = 'f', long = "filter-date", value_name = "DATE")]
    pub filter_date: Option<String>,

    // ===== Credentials =====
    /// HIBP API key
    #[arg(short = 'k', long = "key")]
    pub key: Option<String>,

    /// Environment variable to check for the HIBP API key
    #[arg(short = 'e', long = "env", default_value = DEFAULT_KEY_ENV)]
    pub env: String,

    // ===== Configuration =====
    /// Path to an optional TOML config file
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    // ===== Output =====
    /// Print debug info, including a raw dump of every record
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Suppress response messages and errors, only display results
    #[arg(short = 's', long = "silent")]
    pub silent: bool,
}

impl Cli {
    /// Validate flag combinations and return errors for invalid usage
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.email.trim().is_empty() {
            anyhow::bail!("EMAIL must not be empty");
        }

        if self.debug && self.silent {
            anyhow::bail!("Cannot specify both --debug and --silent");
        }

        if self.env.trim().is_empty() {
            anyhow::bail!("--env must name an environment variable");
        }

        Ok(())
    }

    /// Determine log level from flags, falling back to the configured level
    pub fn log_level<'a>(&self, configured: &'a str) -> &'a str {
        if self.debug {
            "debug"
        } else if self.silent {
            "off"
        } else {
            configured
        }
    }

    /// Whether to show a spinner while lookups are in flight
    pub fn should_show_progress(&self) -> bool {
        !self.debug && !self.silent
    }

    /// Resolve the HIBP API key from `--key` or the process environment
    pub fn resolve_api_key(&self) -> anyhow::Result<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    /// Resolve the HIBP API key using `lookup` for environment access
    ///
    /// `--key` wins; otherwise the variable named by `--env` is used.
    /// Blank values count as missing.
    pub fn resolve_api_key_with<F>(&self, lookup: F) -> anyhow::Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = self.key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            return Ok(key.to_string());
        }

        match lookup(&self.env) {
            Some(key) if !key.trim().is_empty() => {
                tracing::debug!("Using HIBP API key from ${}", self.env);
                Ok(key.trim().to_string())
            }
            _ => anyhow::bail!("No API key provided (use --key or set ${})", self.env),
        }
    }
}
