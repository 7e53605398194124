//! Extractors for path parameters captured by the route table.
//!
//! The dispatcher stores the captures of the matched route in the request
//! extensions before calling the handler, so handlers read them the same way
//! they would read axum's own `Path` extractor. The pattern of the matched
//! route is stored next to them and feeds the `ErrorContext` of the request.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts, response::Response};

use super::pattern::Captures;
use crate::logging::errors::ErrorContext;
use crate::response;

/// Pattern of the route the dispatcher matched, e.g. `/{slug}/screenshot`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRoute(pub String);

/// All parameters captured by the matched route
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(pub Captures);

impl RouteParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RouteParams {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RouteParams>()
            .cloned()
            .ok_or_else(response::not_found_html)
    }
}

/// The `{slug}` parameter of an archive route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slug(pub String);

impl<S: Send + Sync> FromRequestParts<S> for Slug {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = RouteParams::from_request_parts(parts, state).await?;
        params
            .get("slug")
            .map(|slug| Slug(slug.to_string()))
            .ok_or_else(response::not_found_html)
    }
}

/// The `{*path}` parameter of the static asset route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPath(pub String);

impl<S: Send + Sync> FromRequestParts<S> for AssetPath {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = RouteParams::from_request_parts(parts, state).await?;
        params
            .get("path")
            .map(|path| AssetPath(path.to_string()))
            .ok_or_else(response::not_found_html)
    }
}

/// The logging context of a request: its method and, once the dispatcher has
/// matched it, the route pattern.
impl<S: Send + Sync> FromRequestParts<S> for ErrorContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let context = ErrorContext::new().with_method(parts.method.as_str());
        Ok(match parts.extensions.get::<MatchedRoute>() {
            Some(MatchedRoute(pattern)) => context.with_route(pattern.as_str()),
            None => context,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn error_context_carries_route_and_method() {
        let (mut parts, _) = Request::post("/abc123/screenshot").body(()).unwrap().into_parts();
        parts
            .extensions
            .insert(MatchedRoute("/{slug}/screenshot".to_string()));

        let context = ErrorContext::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(context.route_path.as_deref(), Some("/{slug}/screenshot"));
        assert_eq!(context.method.as_deref(), Some("POST"));
    }

    #[tokio::test]
    async fn error_context_without_match_has_method_only() {
        let (mut parts, _) = Request::get("/").body(()).unwrap().into_parts();

        let context = ErrorContext::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(context.route_path, None);
        assert_eq!(context.method.as_deref(), Some("GET"));
    }
}
