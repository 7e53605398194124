//! # Route Table Module
//!
//! The route table is an ordered list of `(pattern, verbs, predicate, endpoint)`
//! entries. Order is semantically load-bearing: resolution walks the entries in
//! registration order and the first route whose pattern, verb and header
//! predicate all match wins. This is what lets `/{slug}` carry a JSON variant
//! selected by `Content-Type` ahead of its unconditional HTML counterpart.
//!
//! The table is built once at start-up and never mutated afterwards, so it is
//! shared between request tasks behind an `Arc` without any locking.

use std::fmt;

use axum::http::{HeaderMap, Method};
use thiserror::Error;

use super::matcher::HeaderPredicate;
use super::pattern::{Captures, PathPattern};

///////////////////////////////////////////////////////////////////////////////
//****                         Public Types                              ****//
///////////////////////////////////////////////////////////////////////////////

/// HTTP verbs the table registers routes for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
}

impl Verb {
    /// `Get` also answers `HEAD`, mirroring axum's method router.
    pub fn matches(self, method: &Method) -> bool {
        match self {
            Verb::Get => method == Method::GET || method == Method::HEAD,
            Verb::Post => method == Method::POST,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
        }
    }
}

/// The semantic handler a route resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Homepage,
    SearchArchives,
    SearchArchivesJson,
    CreateArchive,
    CreateArchiveJson,
    CountPreviousArchives,
    /// Frozen v1 creation entry point behind `/new`, `/bookmark` and `/add`.
    CreateArchiveLegacy,
    ShowArchive,
    ShowArchiveJson,
    ShowArchiveScreenshot,
    ShowArchiveSnapshot,
    StaticAsset,
}

impl Endpoint {
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Homepage => "homepage",
            Endpoint::SearchArchives => "search_archives",
            Endpoint::SearchArchivesJson => "search_archives_json",
            Endpoint::CreateArchive => "create_archive",
            Endpoint::CreateArchiveJson => "create_archive_json",
            Endpoint::CountPreviousArchives => "count_previous_archives",
            Endpoint::CreateArchiveLegacy => "create_archive_legacy",
            Endpoint::ShowArchive => "show_archive",
            Endpoint::ShowArchiveJson => "show_archive_json",
            Endpoint::ShowArchiveScreenshot => "show_archive_screenshot",
            Endpoint::ShowArchiveSnapshot => "show_archive_snapshot",
            Endpoint::StaticAsset => "static_asset",
        }
    }
}

/// A single entry of the route table
#[derive(Debug, Clone)]
pub struct Route {
    pattern: PathPattern,
    verbs: Vec<Verb>,
    predicate: Option<HeaderPredicate>,
    endpoint: Endpoint,
}

impl Route {
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn verbs(&self) -> &[Verb] {
        &self.verbs
    }

    pub fn predicate(&self) -> Option<&HeaderPredicate> {
        self.predicate.as_ref()
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    fn overlaps(&self, other: &Route) -> bool {
        self.pattern.same_shape(&other.pattern)
            && self.verbs.iter().any(|verb| other.verbs.contains(verb))
    }
}

/// Outcome of resolving a request against the table
#[derive(Debug)]
pub enum Resolution<'a> {
    Matched { route: &'a Route, params: Captures },
    /// Some pattern matched the path but none of its routes accepts the method.
    MethodNotAllowed { allowed: Vec<Verb> },
    NotFound,
}

/// Errors raised while building the route table
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("invalid route pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("route '{pattern}' registers no HTTP verb")]
    NoVerbs { pattern: String },
    #[error("route '{pattern}' -> {endpoint} can never match: shadowed by an earlier route")]
    Shadowed { pattern: String, endpoint: &'static str },
}

///////////////////////////////////////////////////////////////////////////////
//****                         Route Table                               ****//
///////////////////////////////////////////////////////////////////////////////

/// The immutable, ordered route table
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Resolve a request to exactly one route, first match wins.
    pub fn resolve(&self, method: &Method, path: &str, headers: &HeaderMap) -> Resolution<'_> {
        let mut allowed: Vec<Verb> = Vec::new();

        for route in &self.routes {
            let Some(params) = route.pattern.matches(path) else {
                continue;
            };

            if !route.verbs.iter().any(|verb| verb.matches(method)) {
                for verb in &route.verbs {
                    if !allowed.contains(verb) {
                        allowed.push(*verb);
                    }
                }
                continue;
            }

            if let Some(predicate) = &route.predicate {
                if !predicate.matches(headers) {
                    continue;
                }
            }

            return Resolution::Matched { route, params };
        }

        if allowed.is_empty() {
            Resolution::NotFound
        } else {
            Resolution::MethodNotAllowed { allowed }
        }
    }
}

impl fmt::Display for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<10} | {:<30} | {:<30} | {}",
            "Methods", "Path", "Predicate", "Handler"
        )?;
        writeln!(f, "{:-<100}", "")?;
        for route in &self.routes {
            let verbs: Vec<&str> = route.verbs.iter().map(|verb| verb.as_str()).collect();
            let predicate = route
                .predicate
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "-".to_string());
            writeln!(
                f,
                "{:<10} | {:<30} | {:<30} | {}",
                verbs.join(","),
                route.pattern,
                predicate,
                route.endpoint.name()
            )?;
        }
        Ok(())
    }
}

/// Collects routes in registration order and validates them on `build`
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    entries: Vec<(String, Vec<Verb>, Option<HeaderPredicate>, Endpoint)>,
}

impl RouteTableBuilder {
    pub fn route(mut self, pattern: &str, verbs: &[Verb], endpoint: Endpoint) -> Self {
        self.entries
            .push((pattern.to_string(), verbs.to_vec(), None, endpoint));
        self
    }

    /// Register a route that only matches when `predicate` holds.
    pub fn route_when(
        mut self,
        pattern: &str,
        verbs: &[Verb],
        predicate: HeaderPredicate,
        endpoint: Endpoint,
    ) -> Self {
        self.entries
            .push((pattern.to_string(), verbs.to_vec(), Some(predicate), endpoint));
        self
    }

    pub fn build(self) -> Result<RouteTable, RouteTableError> {
        let mut routes: Vec<Route> = Vec::with_capacity(self.entries.len());

        for (raw, verbs, predicate, endpoint) in self.entries {
            if verbs.is_empty() {
                return Err(RouteTableError::NoVerbs { pattern: raw });
            }

            let route = Route {
                pattern: PathPattern::parse(&raw)?,
                verbs,
                predicate,
                endpoint,
            };

            // An earlier unconditional route, or one with the same predicate,
            // for the same pattern and verb makes this one unreachable.
            let shadowed = routes.iter().any(|earlier| {
                earlier.overlaps(&route)
                    && (earlier.predicate.is_none() || earlier.predicate == route.predicate)
            });
            if shadowed {
                return Err(RouteTableError::Shadowed {
                    pattern: raw,
                    endpoint: route.endpoint.name(),
                });
            }

            routes.push(route);
        }

        Ok(RouteTable { routes })
    }
}

///////////////////////////////////////////////////////////////////////////////
//****                       Public Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Build the service's route table.
///
/// The legacy `/new`, `/bookmark` and `/add` aliases are frozen: external
/// callers depend on them, so they keep accepting both GET and POST and keep
/// forwarding to the legacy creation handler.
pub fn create_route_table() -> Result<RouteTable, RouteTableError> {
    use Verb::{Get, Post};

    RouteTable::builder()
        .route("/", &[Get], Endpoint::Homepage)
        .route("/search", &[Get], Endpoint::SearchArchives)
        .route("/api/search", &[Get], Endpoint::SearchArchivesJson)
        .route("/archive", &[Post], Endpoint::CreateArchive)
        .route("/api/archive", &[Post], Endpoint::CreateArchiveJson)
        .route("/api/count-previous-archives", &[Get], Endpoint::CountPreviousArchives)
        // legacy v1 links
        .route("/new", &[Post, Get], Endpoint::CreateArchiveLegacy)
        .route("/bookmark", &[Post, Get], Endpoint::CreateArchiveLegacy)
        .route("/add", &[Post, Get], Endpoint::CreateArchiveLegacy)
        .route("/api/archives/{slug}", &[Get], Endpoint::ShowArchiveJson)
        .route("/static/{*path}", &[Get], Endpoint::StaticAsset)
        .route_when(
            "/{slug}",
            &[Get],
            HeaderPredicate::json_content_type(),
            Endpoint::ShowArchiveJson,
        )
        .route("/{slug}", &[Get], Endpoint::ShowArchive)
        .route("/{slug}/screenshot", &[Get], Endpoint::ShowArchiveScreenshot)
        .route("/{slug}/snapshot", &[Get], Endpoint::ShowArchiveSnapshot)
        .build()
}

///////////////////////////////////////////////////////////////////////////////
//****                              Tests                                ****//
///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, header};

    fn resolve_endpoint(table: &RouteTable, method: Method, path: &str) -> Option<Endpoint> {
        match table.resolve(&method, path, &HeaderMap::new()) {
            Resolution::Matched { route, .. } => Some(route.endpoint()),
            _ => None,
        }
    }

    #[test]
    fn every_registered_route_resolves_to_itself_without_headers() {
        let table = create_route_table().unwrap();
        let headers = HeaderMap::new();

        for route in table.routes().iter().filter(|r| r.predicate().is_none()) {
            let path = route.pattern().as_str().replace("{slug}", "abc123").replace("{*path}", "css/style.css");
            for verb in route.verbs() {
                let method = match verb {
                    Verb::Get => Method::GET,
                    Verb::Post => Method::POST,
                };
                let matching: Vec<&Route> = table
                    .routes()
                    .iter()
                    .filter(|candidate| {
                        candidate.pattern().as_str() == route.pattern().as_str()
                            && candidate.verbs().iter().any(|v| v.matches(&method))
                            && candidate.predicate().is_none_or(|p| p.matches(&headers))
                    })
                    .collect();
                assert_eq!(matching.len(), 1, "ambiguous route {} {}", verb.as_str(), path);

                match table.resolve(&method, &path, &headers) {
                    Resolution::Matched { route: matched, .. } => {
                        assert_eq!(matched.endpoint(), route.endpoint(), "{} {}", verb.as_str(), path)
                    }
                    other => panic!("{} {} did not match: {:?}", verb.as_str(), path, other),
                }
            }
        }
    }

    #[test]
    fn slug_route_is_negotiated_by_content_type() {
        let table = create_route_table().unwrap();

        let mut json = HeaderMap::new();
        json.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        match table.resolve(&Method::GET, "/foo", &json) {
            Resolution::Matched { route, params } => {
                assert_eq!(route.endpoint(), Endpoint::ShowArchiveJson);
                assert_eq!(params, vec![("slug".to_string(), "foo".to_string())]);
            }
            other => panic!("unexpected resolution: {:?}", other),
        }

        assert_eq!(resolve_endpoint(&table, Method::GET, "/foo"), Some(Endpoint::ShowArchive));
        assert_eq!(
            resolve_endpoint(&table, Method::GET, "/api/archives/foo"),
            Some(Endpoint::ShowArchiveJson)
        );
    }

    #[test]
    fn legacy_aliases_share_one_handler_for_get_and_post() {
        let table = create_route_table().unwrap();
        for path in ["/new", "/bookmark", "/add"] {
            for method in [Method::GET, Method::POST] {
                assert_eq!(
                    resolve_endpoint(&table, method.clone(), path),
                    Some(Endpoint::CreateArchiveLegacy),
                    "{} {}",
                    method,
                    path
                );
            }
        }
    }

    #[test]
    fn literal_routes_win_over_slug() {
        let table = create_route_table().unwrap();
        assert_eq!(resolve_endpoint(&table, Method::GET, "/search"), Some(Endpoint::SearchArchives));
        assert_eq!(resolve_endpoint(&table, Method::GET, "/static/app.css"), Some(Endpoint::StaticAsset));
        // A POST-only literal falls through to the slug view for GET.
        assert_eq!(resolve_endpoint(&table, Method::GET, "/archive"), Some(Endpoint::ShowArchive));
    }

    #[test]
    fn unmatched_paths_and_methods() {
        let table = create_route_table().unwrap();
        let headers = HeaderMap::new();

        assert!(matches!(
            table.resolve(&Method::GET, "/a/b/c", &headers),
            Resolution::NotFound
        ));
        match table.resolve(&Method::DELETE, "/abc123", &headers) {
            Resolution::MethodNotAllowed { allowed } => assert_eq!(allowed, vec![Verb::Get]),
            other => panic!("unexpected resolution: {:?}", other),
        }
        match table.resolve(&Method::GET, "/api/archive", &headers) {
            Resolution::MethodNotAllowed { allowed } => assert_eq!(allowed, vec![Verb::Post]),
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[test]
    fn head_is_served_by_get_routes() {
        let table = create_route_table().unwrap();
        assert_eq!(resolve_endpoint(&table, Method::HEAD, "/"), Some(Endpoint::Homepage));
    }

    #[test]
    fn predicated_route_after_default_is_rejected() {
        let result = RouteTable::builder()
            .route("/{slug}", &[Verb::Get], Endpoint::ShowArchive)
            .route_when(
                "/{slug}",
                &[Verb::Get],
                HeaderPredicate::json_content_type(),
                Endpoint::ShowArchiveJson,
            )
            .build();

        assert_eq!(
            result.unwrap_err(),
            RouteTableError::Shadowed {
                pattern: "/{slug}".to_string(),
                endpoint: "show_archive_json",
            }
        );
    }

    #[test]
    fn duplicate_and_empty_routes_are_rejected() {
        let duplicate = RouteTable::builder()
            .route("/search", &[Verb::Get], Endpoint::SearchArchives)
            .route("/search", &[Verb::Get, Verb::Post], Endpoint::SearchArchivesJson)
            .build();
        assert!(matches!(duplicate, Err(RouteTableError::Shadowed { .. })));

        let renamed = RouteTable::builder()
            .route("/{slug}", &[Verb::Get], Endpoint::ShowArchive)
            .route("/{id}", &[Verb::Get], Endpoint::ShowArchiveJson)
            .build();
        assert_eq!(
            renamed.unwrap_err(),
            RouteTableError::Shadowed {
                pattern: "/{id}".to_string(),
                endpoint: "show_archive_json",
            }
        );

        let no_verbs = RouteTable::builder()
            .route("/search", &[], Endpoint::SearchArchives)
            .build();
        assert!(matches!(no_verbs, Err(RouteTableError::NoVerbs { .. })));
    }

    #[test]
    fn table_listing_keeps_registration_order() {
        let listing = create_route_table().unwrap().to_string();
        let json_variant = listing.find("show_archive_json").unwrap();
        let html_variant = listing.find("| show_archive\n").unwrap();
        assert!(json_variant < html_variant);
        assert!(listing.contains("content-type ~ application/json"));
    }
}
