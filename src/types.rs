// src/types.rs
use serde::Deserialize;

/// A breach as returned by the haveibeenpwned.com v3 API
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BreachRecord {
    pub name: String,
    pub title: String,
    pub domain: String,

    /// Date the breach occurred (YYYY-MM-DD)
    pub breach_date: String,

    /// Date the breach was added to HIBP (RFC 3339)
    pub added_date: String,

    pub modified_date: String,
    pub pwn_count: i64,
    pub description: String,
    pub data_classes: Vec<String>,
    pub is_verified: bool,
    pub is_fabricated: bool,
    pub is_sensitive: bool,
    pub is_retired: bool,
    pub is_spam_list: bool,
    pub logo_path: String,
}

/// A paste as returned by the haveibeenpwned.com v3 API
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PasteRecord {
    /// Paste service the record came from (e.g. "Pastebin")
    pub source: String,

    pub id: String,

    pub title: Option<String>,

    /// Date the paste was posted (RFC 3339), not always known
    pub date: Option<String>,

    pub email_count: i64,
}

/// Envelope returned by the hacked-emails.com lookup endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HackedEmailsResponse {
    pub status: String,
    pub query: String,
    pub results: i64,

    #[serde(rename = "data")]
    pub breaches: Option<Vec<HackedEmailsBreach>>,
}

impl HackedEmailsResponse {
    /// Status value the service uses for a syntactically invalid address
    pub const BAD_SYNTAX: &'static str = "badsintax";

    /// Whether the service rejected the queried address as malformed
    pub fn is_bad_syntax(&self) -> bool {
        self.status == Self::BAD_SYNTAX
    }

    /// Take the breach list, treating a missing list as empty
    pub fn into_breaches(self) -> Vec<HackedEmailsBreach> {
        self.breaches.unwrap_or_default()
    }
}

/// A single breach entry from hacked-emails.com
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HackedEmailsBreach {
    pub title: String,
    pub author: String,
    pub verified: bool,

    /// Date the leak was indexed by the service (RFC 3339)
    pub date_created: String,

    pub date_leaked: String,
    pub emails_count: i64,
    pub source_url: String,
    pub source_lines: i64,
    pub source_size: i64,
    pub source_network: String,
    pub source_provider: String,
    pub details: String,
}
