//! # Response Module
//!
//! The fixed vocabulary every handler uses to answer a request. Each function
//! builds a complete `Response` (status, a single `Content-Type`, body) in one
//! value, so a handler that returns one of them has written exactly one
//! response and the status is always decided before the body.
//!
//! ## Vocabulary
//!
//! - `success_json` / `success_template` - 200 JSON or rendered HTML
//! - `bad_request_json`, `invalid_request_json`, `not_found_json` - 400, 422 and
//!   404 with a `{"error": ...}` body
//! - `internal_error_json` / `internal_error_html` - 500 without leaking the cause
//! - `not_found_html` / `method_not_allowed_html` - router fallbacks

use std::fmt;

use axum::{
    body::Body,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::routing::table::Verb;
use crate::web::views::{DEFAULT_LAYOUT, Views};

///////////////////////////////////////////////////////////////////////////////
//****                         Public Constants                          ****//
///////////////////////////////////////////////////////////////////////////////

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const HTML_CONTENT_TYPE: &str = "text/html";

pub const NOT_FOUND_MESSAGE: &str = "<h2>Sorry Could not Find Resource. 404 Error</h2>";
pub const INTERNAL_ERROR_MESSAGE: &str = "<h2>Internal Server Error. Please try again.</h2>";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "<h2>Method Not Allowed. 405 Error</h2>";

const INTERNAL_ERROR_JSON: &str = r#"{"error":"internal server error"}"#;

///////////////////////////////////////////////////////////////////////////////
//****                       Public Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

/// 200 with the JSON encoding of `data`.
pub fn success_json<T: Serialize + ?Sized>(data: &T) -> Response {
    json_response(StatusCode::OK, data)
}

/// 200 with the named page rendered inside the default layout.
///
/// A rendering failure is logged here and answered with `internal_error_html`.
pub fn success_template<T: Serialize + ?Sized>(views: &Views, page: &str, data: &T) -> Response {
    match views.render(DEFAULT_LAYOUT, page, data) {
        Ok(html) => respond(StatusCode::OK, HTML_CONTENT_TYPE, html),
        Err(err) => {
            error!(page = page, error = %err, "Failed to render template");
            internal_error_html(&err)
        }
    }
}

/// 400 with `{"error": data}`.
pub fn bad_request_json<T: Serialize + ?Sized>(data: &T) -> Response {
    json_response(StatusCode::BAD_REQUEST, &ErrorBody { error: data })
}

/// 422 with `{"error": data}`.
pub fn invalid_request_json<T: Serialize + ?Sized>(data: &T) -> Response {
    json_response(StatusCode::UNPROCESSABLE_ENTITY, &ErrorBody { error: data })
}

/// 404 with `{"error": data}`, for JSON clients asking for a missing resource.
pub fn not_found_json<T: Serialize + ?Sized>(data: &T) -> Response {
    json_response(StatusCode::NOT_FOUND, &ErrorBody { error: data })
}

/// 500 with `{"error": "internal server error"}`.
pub fn internal_error_json() -> Response {
    respond(
        StatusCode::INTERNAL_SERVER_ERROR,
        JSON_CONTENT_TYPE,
        INTERNAL_ERROR_JSON,
    )
}

/// 500 with a generic HTML message.
///
/// The error is never written to the client; the caller is responsible for
/// logging it.
pub fn internal_error_html<E: fmt::Display + ?Sized>(_err: &E) -> Response {
    respond(
        StatusCode::INTERNAL_SERVER_ERROR,
        HTML_CONTENT_TYPE,
        INTERNAL_ERROR_MESSAGE,
    )
}

/// 404 with a generic HTML message. Universal fallback of the router.
pub fn not_found_html() -> Response {
    respond(StatusCode::NOT_FOUND, HTML_CONTENT_TYPE, NOT_FOUND_MESSAGE)
}

/// 405 for a known path requested with a verb it does not accept.
pub fn method_not_allowed_html(allowed: &[Verb]) -> Response {
    let allow = allowed
        .iter()
        .map(|verb| verb.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut response = respond(
        StatusCode::METHOD_NOT_ALLOWED,
        HTML_CONTENT_TYPE,
        METHOD_NOT_ALLOWED_MESSAGE,
    );
    if let Ok(value) = HeaderValue::from_str(&allow) {
        response.headers_mut().insert(header::ALLOW, value);
    }
    response
}

///////////////////////////////////////////////////////////////////////////////
//****                       Private Functions                           ****//
///////////////////////////////////////////////////////////////////////////////

#[derive(Serialize)]
struct ErrorBody<'a, T: ?Sized> {
    error: &'a T,
}

fn json_response<T: Serialize + ?Sized>(status: StatusCode, data: &T) -> Response {
    match serde_json::to_vec(data) {
        Ok(body) => respond(status, JSON_CONTENT_TYPE, body),
        Err(err) => {
            error!(error = %err, "Failed to serialize JSON response");
            internal_error_json()
        }
    }
}

fn respond(status: StatusCode, content_type: &'static str, body: impl Into<Body>) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static(content_type))],
        body.into(),
    )
        .into_response()
}

///////////////////////////////////////////////////////////////////////////////
//****                              Tests                                ****//
///////////////////////////////////////////////////////////////////////////////
