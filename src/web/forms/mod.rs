//! Request payloads accepted by the web and API handlers.

use serde::Deserialize;

pub const DEFAULT_SEARCH_LIMIT: usize = 20;
pub const MAX_SEARCH_LIMIT: usize = 100;

/// `?q=` and optional `?limit=` of the search pages
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl SearchQuery {
    pub fn query(&self) -> &str {
        self.q.as_deref().unwrap_or("").trim()
    }

    /// Requested limit clamped to `1..=MAX_SEARCH_LIMIT`.
    pub fn limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .clamp(1, MAX_SEARCH_LIMIT)
    }
}

/// Form posted by the homepage to `/archive`
#[derive(Debug, Default, Deserialize)]
pub struct CreateArchiveForm {
    #[serde(default)]
    pub url: String,
}

/// JSON body of `POST /api/archive`
#[derive(Debug, Deserialize)]
pub struct CreateArchiveRequest {
    pub url: String,
}

/// Query string or form body of the legacy `/new`, `/bookmark` and `/add` links
#[derive(Debug, Default, Deserialize)]
pub struct LegacyArchiveForm {
    #[serde(default)]
    pub url: Option<String>,
}

impl LegacyArchiveForm {
    /// The submitted URL, `None` when absent or blank.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|url| !url.is_empty())
    }
}

/// `?url=` of `/api/count-previous-archives`
#[derive(Debug, Default, Deserialize)]
pub struct CountPreviousQuery {
    #[serde(default)]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_limit_is_clamped() {
        let query = SearchQuery { q: Some(" rust ".into()), limit: Some(10_000) };
        assert_eq!(query.query(), "rust");
        assert_eq!(query.limit(), MAX_SEARCH_LIMIT);

        let query = SearchQuery { q: None, limit: Some(0) };
        assert_eq!(query.query(), "");
        assert_eq!(query.limit(), 1);

        assert_eq!(SearchQuery::default().limit(), DEFAULT_SEARCH_LIMIT);
    }

    #[test]
    fn legacy_url_ignores_blank_values() {
        assert_eq!(LegacyArchiveForm { url: Some("  ".into()) }.url(), None);
        assert_eq!(LegacyArchiveForm { url: None }.url(), None);
        assert_eq!(
            LegacyArchiveForm { url: Some(" https://example.com ".into()) }.url(),
            Some("https://example.com")
        );
    }
}
