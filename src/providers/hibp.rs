// src/providers/hibp.rs
//! haveibeenpwned.com v3 API client

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, RETRY_AFTER};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use super::account_url;
use crate::config::HibpConfig;
use crate::types::{BreachRecord, PasteRecord};

/// Header carrying the subscription key
const API_KEY_HEADER: &str = "hibp-api-key";

/// haveibeenpwned.com API client
pub struct HibpClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HibpClient {
    /// Display name used in reports
    pub const NAME: &'static str = "haveibeenpwned.com";

    /// Create a new client authenticated with `api_key`
    pub fn new(api_key: &str, config: &HibpConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut key = HeaderValue::from_str(api_key).context("API key is not a valid header value")?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid HIBP base URL: {}", config.base_url))?;

        Ok(Self { client, base_url })
    }

    /// Fetch every breach the address appears in
    /// Endpoint: GET {base_url}/breachedaccount/{email}?truncateResponse=false
    pub async fn lookup_breaches(&self, email: &str) -> Result<Vec<BreachRecord>> {
        let mut url = account_url(&self.base_url, "breachedaccount", email)?;
        url.query_pairs_mut().append_pair("truncateResponse", "false");

        let breaches: Vec<BreachRecord> = self.get_records(url, "breach").await?;
        info!("Found {} breaches on {}", breaches.len(), Self::NAME);
        Ok(breaches)
    }

    /// Fetch every paste the address appears in
    /// Endpoint: GET {base_url}/pasteaccount/{email}
    pub async fn lookup_pastes(&self, email: &str) -> Result<Vec<PasteRecord>> {
        let url = account_url(&self.base_url, "pasteaccount", email)?;

        let pastes: Vec<PasteRecord> = self.get_records(url, "paste").await?;
        info!("Found {} pastes on {}", pastes.len(), Self::NAME);
        Ok(pastes)
    }

    /// GET a JSON list, treating 404 as "no records"
    async fn get_records<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<Vec<T>> {
        debug!("Fetching {} data from {}", what, url.path());

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to send {} request to {}", what, Self::NAME))?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!("No {} records on {}", what, Self::NAME);
            return Ok(Vec::new());
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown")
                .to_string();
            anyhow::bail!(
                "{} rate limit exceeded (retry after {} seconds)",
                Self::NAME,
                retry_after
            );
        }

        if !status.is_success() {
            anyhow::bail!(
                "{} API returned error: {} - {}",
                Self::NAME,
                status,
                response.text().await.unwrap_or_default()
            );
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} {} response", Self::NAME, what))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> HibpConfig {
        HibpConfig {
            base_url: format!("{}/api/v3", server.uri()),
            ..Default::default()
        }
    }

    #[test]
    fn test_hibp_client_creation() {
        let client = HibpClient::new("test_key", &HibpConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_api_key_rejected() {
        let client = HibpClient::new("bad\nkey", &HibpConfig::default());
        assert!(client.is_err());
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let config = HibpConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(HibpClient::new("key", &config).is_err());
    }

    #[tokio::test]
    async fn test_lookup_breaches_sends_key_and_parses() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/breachedaccount/user@example.com"))
            .and(query_param("truncateResponse", "false"))
            .and(header("hibp-api-key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "Name": "Adobe",
                    "Title": "Adobe",
                    "Domain": "adobe.com",
                    "BreachDate": "2013-10-04",
                    "AddedDate": "2013-12-04T00:00:00Z",
                    "PwnCount": 152445165,
                    "IsVerified": true
                }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = HibpClient::new("secret", &config_for(&server)).unwrap();
        let breaches = client.lookup_breaches("user@example.com").await.unwrap();

        assert_eq!(breaches.len(), 1);
        assert_eq!(breaches[0].title, "Adobe");
        assert_eq!(breaches[0].pwn_count, 152445165);
    }

    #[tokio::test]
    async fn test_not_found_means_no_records() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = HibpClient::new("secret", &config_for(&server)).unwrap();

        assert!(client.lookup_breaches("clean@example.com").await.unwrap().is_empty());
        assert!(client.lookup_pastes("clean@example.com").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_pastes() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/pasteaccount/user@example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"Source": "Pastebin", "Id": "8Q0BvKD8", "Title": "syslog", "Date": "2014-03-04T19:14:54Z", "EmailCount": 139},
                {"Source": "AdHocUrl", "Id": "http://example.com/dump.txt", "Title": null, "Date": null, "EmailCount": 11}
            ])))
            .mount(&server)
            .await;

        let client = HibpClient::new("secret", &config_for(&server)).unwrap();
        let pastes = client.lookup_pastes("user@example.com").await.unwrap();

        assert_eq!(pastes.len(), 2);
        assert_eq!(pastes[0].source, "Pastebin");
        assert!(pastes[1].date.is_none());
    }

    #[tokio::test]
    async fn test_rate_limit_error_mentions_retry_after() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "3"))
            .mount(&server)
            .await;

        let client = HibpClient::new("secret", &config_for(&server)).unwrap();
        let err = client.lookup_breaches("user@example.com").await.unwrap_err();

        assert!(err.to_string().contains("retry after 3 seconds"));
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Access denied due to missing hibp-api-key."))
            .mount(&server)
            .await;

        let client = HibpClient::new("secret", &config_for(&server)).unwrap();
        let err = client.lookup_breaches("user@example.com").await.unwrap_err();

        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("missing hibp-api-key"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = HibpClient::new("secret", &config_for(&server)).unwrap();
        assert!(client.lookup_pastes("user@example.com").await.is_err());
    }
}
