//! # Web Handlers Module
//!
//! The semantic handlers behind the route table. Each one asks the archive
//! service for what it needs and answers through the response contract, so
//! HTML and JSON variants of the same resource differ only in the response
//! function they end with.
//!
//! ## Error Handling
//!
//! - Client input problems are answered with 400/422 JSON (API) or the
//!   homepage form with a message (human views)
//! - Missing archives are 404, HTML or JSON depending on the variant
//! - Service failures are logged here with their cause and answered with a
//!   generic 500

use std::fmt;

use axum::{
    extract::{
        Form, Json, Query, Request, State,
        rejection::{FormRejection, JsonRejection, QueryRejection},
    },
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::forms::{
    CountPreviousQuery, CreateArchiveForm, CreateArchiveRequest, LegacyArchiveForm, SearchQuery,
};
use crate::AppState;
use crate::archive::{Archive, ArchiveError, is_valid_slug};
use crate::assets::AssetError;
use crate::logging::errors::{ErrorContext, ErrorSeverity, log_error};
use crate::response::{
    HTML_CONTENT_TYPE, bad_request_json, internal_error_html, internal_error_json, invalid_request_json,
    not_found_html, not_found_json, success_json, success_template,
};
use crate::routing::params::{AssetPath, Slug};

///////////////////////////////////////////////////////////////////////////////
//****                         Private Structs                           ****//
///////////////////////////////////////////////////////////////////////////////

#[derive(Serialize)]
struct HomepageContext {
    title: &'static str,
    error: Option<String>,
    url: Option<String>,
}

#[derive(Serialize)]
struct SearchContext<'a> {
    title: String,
    query: &'a str,
    results: &'a [Archive],
}

#[derive(Serialize)]
struct ArchiveContext<'a> {
    title: &'a str,
    archive: &'a Archive,
}

#[derive(Serialize)]
struct SearchResponse<'a> {
    query: &'a str,
    results: &'a [Archive],
}

#[derive(Serialize)]
struct CountPreviousResponse<'a> {
    url: &'a str,
    count: usize,
}

/// Derived assets an archive can redirect to
#[derive(Debug, Clone, Copy)]
enum Capture {
    Screenshot,
    Snapshot,
}

impl Capture {
    fn handler(self) -> &'static str {
        match self {
            Capture::Screenshot => "show_archive_screenshot",
            Capture::Snapshot => "show_archive_snapshot",
        }
    }

    fn location(self, archive: &Archive) -> Option<&str> {
        match self {
            Capture::Screenshot => archive.screenshot.as_deref(),
            Capture::Snapshot => archive.snapshot.as_deref(),
        }
    }
}

///////////////////////////////////////////////////////////////////////////////
//****                       Public Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

pub async fn homepage(State(state): State<AppState>) -> Response {
    render_homepage(&state, None, None)
}

/// Human search view. Unparsable query parameters are treated as an empty search.
pub async fn search_archives(
    State(state): State<AppState>,
    context: ErrorContext,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Response {
    let query = query.map(|Query(query)| query).unwrap_or_default();

    match state.archives.search(query.query(), query.limit()).await {
        Ok(results) => success_template(
            &state.views,
            "search",
            &SearchContext {
                title: format!("Search: {}", query.query()),
                query: query.query(),
                results: &results,
            },
        ),
        Err(err) => {
            log_failure("search_archives", &err, context.with_field("query", query.query()));
            internal_error_html(&err)
        }
    }
}

pub async fn search_archives_json(
    State(state): State<AppState>,
    context: ErrorContext,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return bad_request_json(&rejection.body_text()),
    };

    match state.archives.search(query.query(), query.limit()).await {
        Ok(results) => success_json(&SearchResponse {
            query: query.query(),
            results: &results,
        }),
        Err(err) => {
            log_failure("search_archives_json", &err, context.with_field("query", query.query()));
            internal_error_json()
        }
    }
}

/// Homepage form submission. Success redirects to the new archive.
pub async fn create_archive(
    State(state): State<AppState>,
    context: ErrorContext,
    form: Result<Form<CreateArchiveForm>, FormRejection>,
) -> Response {
    let form = form.map(|Form(form)| form).unwrap_or_default();

    match state.archives.create(&form.url).await {
        Ok(archive) => redirect_to_archive(&archive, context),
        Err(ArchiveError::InvalidUrl(reason)) => render_homepage(&state, Some(reason), Some(form.url)),
        Err(err) => {
            log_failure("create_archive", &err, context.with_field("url", form.url.as_str()));
            internal_error_html(&err)
        }
    }
}

pub async fn create_archive_json(
    State(state): State<AppState>,
    context: ErrorContext,
    payload: Result<Json<CreateArchiveRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return bad_request_json(&rejection.body_text()),
    };

    match state.archives.create(&request.url).await {
        Ok(archive) => success_json(&archive),
        Err(ArchiveError::InvalidUrl(reason)) => invalid_request_json(&reason),
        Err(err) => {
            log_failure("create_archive_json", &err, context.with_field("url", request.url.as_str()));
            internal_error_json()
        }
    }
}

/// The v1 `/new`, `/bookmark` and `/add` entry point.
///
/// Reads `url` from the query string on GET and from the form body on POST.
/// Without a URL it shows the homepage form; external callers rely on this
/// behavior, so it must not change.
pub async fn create_archive_legacy(
    State(state): State<AppState>,
    context: ErrorContext,
    form: Result<Form<LegacyArchiveForm>, FormRejection>,
) -> Response {
    let form = form.map(|Form(form)| form).unwrap_or_default();
    let Some(url) = form.url() else {
        return render_homepage(&state, None, None);
    };

    match state.archives.create(url).await {
        Ok(archive) => redirect_to_archive(&archive, context),
        Err(ArchiveError::InvalidUrl(reason)) => bad_request_json(&reason),
        Err(err) => {
            log_failure("create_archive_legacy", &err, context.with_field("url", url));
            internal_error_html(&err)
        }
    }
}

pub async fn count_previous_archives(
    State(state): State<AppState>,
    context: ErrorContext,
    query: Result<Query<CountPreviousQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return bad_request_json(&rejection.body_text()),
    };
    let Some(url) = query.url.as_deref().map(str::trim).filter(|url| !url.is_empty()) else {
        return bad_request_json("url is required");
    };

    match state.archives.count_previous(url).await {
        Ok(count) => success_json(&CountPreviousResponse { url, count }),
        Err(ArchiveError::InvalidUrl(reason)) => invalid_request_json(&reason),
        Err(err) => {
            log_failure("count_previous_archives", &err, context.with_field("url", url));
            internal_error_json()
        }
    }
}

pub async fn show_archive(
    State(state): State<AppState>,
    context: ErrorContext,
    Slug(slug): Slug,
) -> Response {
    if !is_valid_slug(&slug) {
        return not_found_html();
    }

    match state.archives.find(&slug).await {
        Ok(Some(archive)) => success_template(
            &state.views,
            "archive",
            &ArchiveContext {
                title: archive.title.as_deref().unwrap_or(&archive.url),
                archive: &archive,
            },
        ),
        Ok(None) => not_found_html(),
        Err(err) => {
            log_failure("show_archive", &err, context.with_field("slug", slug.as_str()));
            internal_error_html(&err)
        }
    }
}

/// JSON view of an archive, reached through `/api/archives/{slug}` or through
/// `/{slug}` with a JSON `Content-Type`.
pub async fn show_archive_json(
    State(state): State<AppState>,
    context: ErrorContext,
    Slug(slug): Slug,
) -> Response {
    if !is_valid_slug(&slug) {
        return bad_request_json("bad slug");
    }

    match state.archives.find(&slug).await {
        Ok(Some(archive)) => success_json(&archive),
        Ok(None) => not_found_json("archive not found"),
        Err(err) => {
            log_failure("show_archive_json", &err, context.with_field("slug", slug.as_str()));
            internal_error_json()
        }
    }
}

pub async fn show_archive_screenshot(
    State(state): State<AppState>,
    context: ErrorContext,
    Slug(slug): Slug,
) -> Response {
    redirect_to_capture(&state, context, &slug, Capture::Screenshot).await
}

pub async fn show_archive_snapshot(
    State(state): State<AppState>,
    context: ErrorContext,
    Slug(slug): Slug,
) -> Response {
    redirect_to_capture(&state, context, &slug, Capture::Snapshot).await
}

/// Serve a file below `/static/` from the asset source chosen at start-up.
pub async fn static_asset(
    State(state): State<AppState>,
    context: ErrorContext,
    AssetPath(path): AssetPath,
    request: Request,
) -> Response {
    match state.assets.serve(&path, request).await {
        Ok(response) => response,
        Err(AssetError::NotFound(_)) => not_found_html(),
        Err(err) => {
            log_failure(
                "static_asset",
                &err,
                context
                    .with_field("path", path.as_str())
                    .with_field("source", state.assets.kind()),
            );
            internal_error_html(&err)
        }
    }
}

///////////////////////////////////////////////////////////////////////////////
//****                       Private Functions                           ****//
///////////////////////////////////////////////////////////////////////////////

fn render_homepage(state: &AppState, error: Option<String>, url: Option<String>) -> Response {
    success_template(
        &state.views,
        "homepage",
        &HomepageContext {
            title: "Link Archive",
            error,
            url,
        },
    )
}

fn redirect_to_archive(archive: &Archive, context: ErrorContext) -> Response {
    redirect(StatusCode::SEE_OTHER, &format!("/{}", archive.slug), context)
}

async fn redirect_to_capture(
    state: &AppState,
    context: ErrorContext,
    slug: &str,
    capture: Capture,
) -> Response {
    if !is_valid_slug(slug) {
        return not_found_html();
    }

    match state.archives.find(slug).await {
        Ok(Some(archive)) => match capture.location(&archive) {
            Some(location) => redirect(StatusCode::FOUND, location, context),
            None => not_found_html(),
        },
        Ok(None) => not_found_html(),
        Err(err) => {
            log_failure(capture.handler(), &err, context.with_field("slug", slug));
            internal_error_html(&err)
        }
    }
}

/// Redirects carry an empty `text/html` body.
fn redirect(status: StatusCode, location: &str, context: ErrorContext) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (
            status,
            [
                (header::LOCATION, value),
                (header::CONTENT_TYPE, HeaderValue::from_static(HTML_CONTENT_TYPE)),
            ],
        )
            .into_response(),
        Err(err) => {
            log_failure("redirect", &err, context.with_field("location", location));
            internal_error_html(&err)
        }
    }
}

fn log_failure(handler: &'static str, err: &dyn fmt::Display, context: ErrorContext) {
    log_error(
        ErrorSeverity::Error,
        err.to_string(),
        &context.with_handler(handler),
        file!(),
        line!(),
    );
}
