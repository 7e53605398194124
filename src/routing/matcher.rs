//! Request metadata predicates.
//!
//! # Responsibilities
//! - Decide whether a request carries a header value a route asks for
//! - Stay independent from path matching so the table can combine both
//!
//! # Design Decisions
//! - Header names are case-insensitive, values are compared case-insensitively
//! - A missing or non-UTF-8 header never matches
//! - Substring match so parameters such as `; charset=utf-8` do not defeat it

use std::fmt;

use axum::http::{HeaderMap, HeaderName, header};

/// A predicate over request headers attached to a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderPredicate {
    /// The header exists and its value contains the needle.
    Contains { name: HeaderName, needle: String },
}

impl HeaderPredicate {
    pub fn contains(name: HeaderName, needle: impl Into<String>) -> Self {
        Self::Contains {
            name,
            needle: needle.into().to_ascii_lowercase(),
        }
    }

    /// Matches requests that declare a JSON body via `Content-Type`.
    pub fn json_content_type() -> Self {
        Self::contains(header::CONTENT_TYPE, "application/json")
    }

    /// Returns true if the headers satisfy this predicate.
    pub fn matches(&self, headers: &HeaderMap) -> bool {
        match self {
            Self::Contains { name, needle } => headers
                .get_all(name)
                .iter()
                .filter_map(|value| value.to_str().ok())
                .any(|value| value.to_ascii_lowercase().contains(needle.as_str())),
        }
    }
}

impl fmt::Display for HeaderPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contains { name, needle } => write!(f, "{name} ~ {needle}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_json_content_type() {
        let predicate = HeaderPredicate::json_content_type();

        let mut headers = HeaderMap::new();
        assert!(!predicate.matches(&headers));

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        assert!(predicate.matches(&headers));

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("Application/JSON; charset=utf-8"),
        );
        assert!(predicate.matches(&headers)); // Case insensitive

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));
        assert!(!predicate.matches(&headers));
    }

    #[test]
    fn test_other_header_is_ignored() {
        let predicate = HeaderPredicate::json_content_type();
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        assert!(!predicate.matches(&headers));
    }
}
