// src/providers/hacked_emails.rs
//! hacked-emails.com API client

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use super::endpoint_url;
use crate::config::HackedEmailsConfig;
use crate::types::HackedEmailsResponse;

/// hacked-emails.com API client
pub struct HackedEmailsClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HackedEmailsClient {
    /// Display name used in reports
    pub const NAME: &'static str = "hacked-emails.com";

    /// Create a new client (the service needs no credentials)
    pub fn new(config: &HackedEmailsConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid hacked-emails base URL: {}", config.base_url))?;

        Ok(Self { client, base_url })
    }

    /// Look up an address
    /// Endpoint: GET {base_url}/api?q={email}
    ///
    /// The raw envelope is returned so the caller can act on `status`.
    pub async fn lookup(&self, email: &str) -> Result<HackedEmailsResponse> {
        let url = endpoint_url(&self.base_url, &["api"])?;

        debug!("Querying {} for {}", Self::NAME, email);

        let response = self
            .client
            .get(url)
            .query(&[("q", email)])
            .send()
            .await
            .context("Failed to send request to hacked-emails.com")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "{} API returned error: {} - {}",
                Self::NAME,
                response.status(),
                response.text().await.unwrap_or_default()
            );
        }

        let body: HackedEmailsResponse = response
            .json()
            .await
            .context("Decoding hacked-emails.com response as JSON failed")?;

        info!(
            "{} answered '{}' with {} results",
            Self::NAME,
            body.status,
            body.breaches.as_ref().map_or(0, Vec::len)
        );

        Ok(body)
    }
}
