// src/providers/mod.rs
//! Clients for the breach lookup services

use anyhow::Result;
use url::Url;

pub mod hacked_emails;
pub mod hibp;

pub use hacked_emails::HackedEmailsClient;
pub use hibp::HibpClient;

/// Append `segments` to the path of `base`, keeping any path prefix
///
/// Each segment is percent-encoded on its own, so characters like `/` or
/// `?` can't change the request path. A trailing slash on `base` is ignored.
pub fn endpoint_url(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("Base URL cannot carry a path: {}", base))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Append `endpoint` and the address as path segments of `base`
///
/// Examples:
/// - "https://haveibeenpwned.com/api/v3" + breachedaccount -> ".../api/v3/breachedaccount/a@b.com"
/// - "https://haveibeenpwned.com/api/v3/" gives the same result
pub fn account_url(base: &Url, endpoint: &str, email: &str) -> Result<Url> {
    endpoint_url(base, &[endpoint, email.trim()])
}
