//! # Archive Module
//!
//! The boundary between the router and the archiving business logic. Handlers
//! only talk to an `ArchiveService`; how archives are captured and stored is up
//! to the implementation behind it.
//!
//! ## Implementations
//!
//! - `MemoryArchiveStore`: in-process store used by the binary and the tests

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub use memory::MemoryArchiveStore;

pub const MAX_SLUG_LENGTH: usize = 64;

///////////////////////////////////////////////////////////////////////////////
//****                         Public Structs                            ****//
///////////////////////////////////////////////////////////////////////////////

/// An archived link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Archive {
    pub slug: String,
    pub url: String,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Location of the captured screenshot, if one exists.
    pub screenshot: Option<String>,
    /// Location of the captured page snapshot, if one exists.
    pub snapshot: Option<String>,
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("archive storage failed: {0}")]
    Storage(String),
}

/// Archiving operations the handlers depend on
#[async_trait]
pub trait ArchiveService: Send + Sync {
    /// Archive `url` and return the new archive.
    async fn create(&self, url: &str) -> Result<Archive, ArchiveError>;

    async fn find(&self, slug: &str) -> Result<Option<Archive>, ArchiveError>;

    /// Archives whose URL or title contains `query`, newest first.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Archive>, ArchiveError>;

    /// How many times `url` has been archived before.
    async fn count_previous(&self, url: &str) -> Result<usize, ArchiveError>;
}

///////////////////////////////////////////////////////////////////////////////
//****                       Public Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Parse and normalize a URL submitted for archiving. Only absolute `http`
/// and `https` URLs with a host are accepted.
pub fn normalize_url(raw: &str) -> Result<String, ArchiveError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ArchiveError::InvalidUrl("url is required".to_string()));
    }

    let url = Url::parse(trimmed).map_err(|e| ArchiveError::InvalidUrl(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ArchiveError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                other
            )));
        }
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ArchiveError::InvalidUrl("url has no host".to_string()));
    }

    Ok(url.to_string())
}

/// Slugs are short ASCII identifiers: letters, digits, `-` and `_`.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_SLUG_LENGTH
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_http_urls() {
        assert_eq!(normalize_url(" https://Example.com ").unwrap(), "https://example.com/");
        assert_eq!(
            normalize_url("http://example.com/a?b=c").unwrap(),
            "http://example.com/a?b=c"
        );
    }

    #[test]
    fn rejects_unarchivable_urls() {
        assert!(normalize_url("").is_err());
        assert!(normalize_url("example.com").is_err());
        assert!(normalize_url("ftp://example.com/file").is_err());
        assert!(normalize_url("mailto:someone@example.com").is_err());
    }

    #[test]
    fn validates_slugs() {
        assert!(is_valid_slug("abc123"));
        assert!(is_valid_slug("my-archive_2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("bad slug"));
        assert!(!is_valid_slug("caf\u{e9}"));
        assert!(!is_valid_slug(&"a".repeat(MAX_SLUG_LENGTH + 1)));
    }
}
