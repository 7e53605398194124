//! # Path Pattern Module
//!
//! Parses and matches the path patterns used by the route table. The syntax is
//! the one axum uses for its own routes:
//!
//! - `/search` - literal segments, matched case-sensitively
//! - `/{slug}` - a named parameter capturing exactly one non-empty segment
//! - `/static/{*path}` - a trailing wildcard capturing every remaining segment
//!
//! Trailing slashes are significant: `/search/` does not match `/search`.
//! Request segments are percent-decoded before they are compared or captured;
//! a segment that does not decode to UTF-8 never matches.

use std::fmt;

use percent_encoding::percent_decode_str;

use super::table::RouteTableError;

///////////////////////////////////////////////////////////////////////////////
//****                         Public Structs                            ****//
///////////////////////////////////////////////////////////////////////////////

/// A single segment of a compiled path pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param(String),
    Wildcard(String),
}

/// A compiled path pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

/// Parameters captured while matching a path, in pattern order
pub type Captures = Vec<(String, String)>;

impl PathPattern {
    /// Compile a pattern such as `/{slug}/snapshot`.
    pub fn parse(raw: &str) -> Result<Self, RouteTableError> {
        let invalid = |reason: &str| RouteTableError::InvalidPattern {
            pattern: raw.to_string(),
            reason: reason.to_string(),
        };

        let Some(rest) = raw.strip_prefix('/') else {
            return Err(invalid("pattern must start with '/'"));
        };

        let mut segments: Vec<Segment> = Vec::new();
        if !rest.is_empty() {
            for part in rest.split('/') {
                if matches!(segments.last(), Some(Segment::Wildcard(_))) {
                    return Err(invalid("wildcard must be the last segment"));
                }
                segments.push(parse_segment(part).map_err(|reason| invalid(reason))?);
            }
        }

        let mut names: Vec<&str> = Vec::new();
        for segment in &segments {
            if let Segment::Param(name) | Segment::Wildcard(name) = segment {
                if names.contains(&name.as_str()) {
                    return Err(invalid("duplicate parameter name"));
                }
                names.push(name);
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether both patterns match exactly the same paths. Parameter names
    /// do not take part in matching, so `/{id}` and `/{slug}` have one shape.
    pub fn same_shape(&self, other: &PathPattern) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|pair| match pair {
                    (Segment::Literal(a), Segment::Literal(b)) => a == b,
                    (Segment::Param(_), Segment::Param(_)) => true,
                    (Segment::Wildcard(_), Segment::Wildcard(_)) => true,
                    _ => false,
                })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Match a request path, returning the decoded parameters on success.
    pub fn matches(&self, path: &str) -> Option<Captures> {
        let rest = path.strip_prefix('/')?;
        let parts: Vec<&str> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split('/').collect()
        };

        let mut captures = Captures::new();
        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Literal(literal) => {
                    let part = decode(parts.get(index)?)?;
                    if part != *literal {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let value = parts.get(index).filter(|value| !value.is_empty())?;
                    captures.push((name.clone(), decode(value)?));
                }
                Segment::Wildcard(name) => {
                    let tail = parts.get(index..).unwrap_or_default();
                    if tail.is_empty() || tail.iter().all(|part| part.is_empty()) {
                        return None;
                    }
                    let decoded = tail
                        .iter()
                        .map(|part| decode(part))
                        .collect::<Option<Vec<String>>>()?;
                    captures.push((name.clone(), decoded.join("/")));
                    return Some(captures);
                }
            }
        }

        (parts.len() == self.segments.len()).then_some(captures)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.raw)
    }
}

///////////////////////////////////////////////////////////////////////////////
//****                       Private Functions                           ****//
///////////////////////////////////////////////////////////////////////////////

fn decode(part: &str) -> Option<String> {
    percent_decode_str(part)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

fn parse_segment(part: &str) -> Result<Segment, &'static str> {
    if part.is_empty() {
        return Err("empty segment");
    }

    match part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
        Some(inner) => {
            let (wildcard, name) = match inner.strip_prefix('*') {
                Some(name) => (true, name),
                None => (false, inner),
            };
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err("invalid parameter name");
            }
            Ok(if wildcard {
                Segment::Wildcard(name.to_string())
            } else {
                Segment::Param(name.to_string())
            })
        }
        None if part.contains(['{', '}']) => Err("unbalanced braces"),
        None => Ok(Segment::Literal(part.to_string())),
    }
}

///////////////////////////////////////////////////////////////////////////////
//****                              Tests                                ****//
///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_only_matches_root() {
        let pattern = PathPattern::parse("/").unwrap();
        assert_eq!(pattern.matches("/"), Some(vec![]));
        assert_eq!(pattern.matches("/search"), None);
    }

    #[test]
    fn param_captures_single_segment() {
        let pattern = PathPattern::parse("/{slug}/snapshot").unwrap();
        assert_eq!(
            pattern.matches("/abc123/snapshot"),
            Some(vec![("slug".to_string(), "abc123".to_string())])
        );
        assert_eq!(pattern.matches("/abc123"), None);
        assert_eq!(pattern.matches("//snapshot"), None);
        assert_eq!(pattern.matches("/abc123/snapshot/extra"), None);
    }

    #[test]
    fn trailing_slash_is_significant() {
        let pattern = PathPattern::parse("/search").unwrap();
        assert!(pattern.matches("/search").is_some());
        assert!(pattern.matches("/search/").is_none());
    }

    #[test]
    fn wildcard_captures_remaining_segments() {
        let pattern = PathPattern::parse("/static/{*path}").unwrap();
        assert_eq!(
            pattern.matches("/static/css/style.css"),
            Some(vec![("path".to_string(), "css/style.css".to_string())])
        );
        assert_eq!(pattern.matches("/static/"), None);
        assert_eq!(pattern.matches("/static"), None);
    }

    #[test]
    fn captures_are_percent_decoded() {
        let slug = PathPattern::parse("/{slug}").unwrap();
        assert_eq!(
            slug.matches("/abc%31"),
            Some(vec![("slug".to_string(), "abc1".to_string())])
        );
        assert_eq!(slug.matches("/%FF"), None);

        let asset = PathPattern::parse("/static/{*path}").unwrap();
        assert_eq!(
            asset.matches("/static/css/my%20file.css"),
            Some(vec![("path".to_string(), "css/my file.css".to_string())])
        );
        assert_eq!(
            asset.matches("/static/%2e%2e/Cargo.toml"),
            Some(vec![("path".to_string(), "../Cargo.toml".to_string())])
        );

        let search = PathPattern::parse("/search").unwrap();
        assert!(search.matches("/sea%72ch").is_some());
    }

    #[test]
    fn shape_ignores_param_names() {
        let slug = PathPattern::parse("/{slug}/snapshot").unwrap();
        let id = PathPattern::parse("/{id}/snapshot").unwrap();
        assert!(slug.same_shape(&id));
        assert!(!slug.same_shape(&PathPattern::parse("/{slug}/screenshot").unwrap()));
        assert!(!slug.same_shape(&PathPattern::parse("/{slug}").unwrap()));
        assert!(
            !PathPattern::parse("/{slug}")
                .unwrap()
                .same_shape(&PathPattern::parse("/search").unwrap())
        );
    }

    #[test]
    fn rejects_malformed_patterns() {
        assert!(PathPattern::parse("search").is_err());
        assert!(PathPattern::parse("/{*rest}/tail").is_err());
        assert!(PathPattern::parse("/{slug}/{slug}").is_err());
        assert!(PathPattern::parse("/{sl-ug}").is_err());
        assert!(PathPattern::parse("/a{b").is_err());
        assert!(PathPattern::parse("/a//b").is_err());
    }
}
