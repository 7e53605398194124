//! # Error Logging Module
//!
//! Handlers never show the cause of a server error to the client. This module
//! is where that cause ends up instead: a structured tracing event carrying the
//! severity, the request it happened in and the source location.
//!
//! ## Features
//!
//! - **Severity Levels**: Mapped onto tracing levels
//! - **Request Context**: Route, method and free-form fields attached to each event

use serde_json::json;
use std::collections::BTreeMap;
use tracing::{error, warn};

///////////////////////////////////////////////////////////////////////////////
//****                         Public Structs                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical errors that require immediate attention
    Critical,
    /// Error conditions that should be investigated
    Error,
    /// Warning conditions that may lead to errors
    Warning,
}

impl ErrorSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorSeverity::Critical => "critical",
            ErrorSeverity::Error => "error",
            ErrorSeverity::Warning => "warning",
        }
    }
}

/// Request information attached to a logged error
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    pub route_path: Option<String>,
    pub method: Option<String>,
    pub handler: Option<String>,
    pub additional_fields: BTreeMap<String, String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, route_path: impl Into<String>) -> Self {
        self.route_path = Some(route_path.into());
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_handler(mut self, handler: impl Into<String>) -> Self {
        self.handler = Some(handler.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional_fields.insert(key.into(), value.into());
        self
    }

    /// Serialize context to a JSON string for the log line
    pub fn to_json(&self) -> String {
        let mut context = json!({});

        if let Some(ref route_path) = self.route_path {
            context["route_path"] = json!(route_path);
        }
        if let Some(ref method) = self.method {
            context["method"] = json!(method);
        }
        if let Some(ref handler) = self.handler {
            context["handler"] = json!(handler);
        }

        for (key, value) in &self.additional_fields {
            context[key] = json!(value);
        }

        context.to_string()
    }
}

///////////////////////////////////////////////////////////////////////////////
//****                       Public Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Log an error with its request context
///
/// # Example
///
/// ```rust
/// use linkarchive::logging::errors::{log_error, ErrorContext, ErrorSeverity};
///
/// let context = ErrorContext::new()
///     .with_route("/api/archive")
///     .with_method("POST");
///
/// log_error(ErrorSeverity::Error, "Failed to store archive", &context, file!(), line!());
/// ```
pub fn log_error(
    severity: ErrorSeverity,
    message: impl AsRef<str>,
    context: &ErrorContext,
    file: &str,
    line: u32,
) {
    let message = message.as_ref();
    let context = context.to_json();

    match severity {
        ErrorSeverity::Critical | ErrorSeverity::Error => error!(
            target: "linkarchive::errors",
            severity = severity.as_str(),
            file = file,
            line = line,
            context = %context,
            "{}",
            message
        ),
        ErrorSeverity::Warning => warn!(
            target: "linkarchive::errors",
            severity = severity.as_str(),
            file = file,
            line = line,
            context = %context,
            "{}",
            message
        ),
    }
}

///////////////////////////////////////////////////////////////////////////////
//****                              Tests                                ****//
///////////////////////////////////////////////////////////////////////////////
