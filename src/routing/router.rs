//! # Router Module
//!
//! Builds the axum `Router` for Link Archive. Every request goes through a
//! single dispatcher that resolves it against the immutable route table, so
//! registration order and header predicates decide the handler exactly the way
//! the table describes it.
//!
//! ## Request Flow
//!
//! 1. Resolve `(method, path, headers)` against the route table
//! 2. Store the captured path parameters and the matched pattern in the
//!    request extensions
//! 3. Call the endpoint's handler with the request and the application state
//! 4. Unmatched paths answer with the HTML 404, known paths with a foreign verb
//!    answer with 405
//!
//! ## Architecture
//!
//! 1. Table dispatcher registered as the router fallback
//! 2. Application state injection
//! 3. HTTP tracing middleware

use axum::{
    Router,
    extract::{Request, State},
    handler::Handler,
    response::Response,
};
use tower_http::trace::TraceLayer;
use tracing::debug;

use super::params::{MatchedRoute, RouteParams};
use super::table::{Endpoint, Resolution};
use crate::AppState;
use crate::response;
use crate::web::handlers;

///////////////////////////////////////////////////////////////////////////////
//****                       Public Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .fallback(dispatch)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

///////////////////////////////////////////////////////////////////////////////
//****                       Private Functions                           ****//
///////////////////////////////////////////////////////////////////////////////

async fn dispatch(State(state): State<AppState>, mut req: Request) -> Response {
    let resolved = match state
        .routes
        .resolve(req.method(), req.uri().path(), req.headers())
    {
        Resolution::Matched { route, params } => Ok((route, params)),
        Resolution::MethodNotAllowed { allowed } => {
            Err(response::method_not_allowed_html(&allowed))
        }
        Resolution::NotFound => Err(response::not_found_html()),
    };

    match resolved {
        Ok((route, params)) => {
            let endpoint = route.endpoint();
            debug!(
                method = %req.method(),
                path = req.uri().path(),
                handler = endpoint.name(),
                "Route matched"
            );
            let matched = MatchedRoute(route.pattern().as_str().to_string());
            req.extensions_mut().insert(RouteParams(params));
            req.extensions_mut().insert(matched);
            call_endpoint(endpoint, req, state).await
        }
        Err(response) => response,
    }
}

async fn call_endpoint(endpoint: Endpoint, req: Request, state: AppState) -> Response {
    match endpoint {
        Endpoint::Homepage => handlers::homepage.call(req, state).await,
        Endpoint::SearchArchives => handlers::search_archives.call(req, state).await,
        Endpoint::SearchArchivesJson => handlers::search_archives_json.call(req, state).await,
        Endpoint::CreateArchive => handlers::create_archive.call(req, state).await,
        Endpoint::CreateArchiveJson => handlers::create_archive_json.call(req, state).await,
        Endpoint::CountPreviousArchives => {
            handlers::count_previous_archives.call(req, state).await
        }
        Endpoint::CreateArchiveLegacy => handlers::create_archive_legacy.call(req, state).await,
        Endpoint::ShowArchive => handlers::show_archive.call(req, state).await,
        Endpoint::ShowArchiveJson => handlers::show_archive_json.call(req, state).await,
        Endpoint::ShowArchiveScreenshot => {
            handlers::show_archive_screenshot.call(req, state).await
        }
        Endpoint::ShowArchiveSnapshot => handlers::show_archive_snapshot.call(req, state).await,
        Endpoint::StaticAsset => handlers::static_asset.call(req, state).await,
    }
}
