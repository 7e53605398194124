//! # Views Module
//!
//! Named HTML templates for the human-facing pages, written with `maud`. A
//! view is rendered by binding a JSON context into a page and wrapping the
//! result in a layout, which is what `response::success_template` relies on.
//!
//! ## Templates
//!
//! - Layout `default`: document shell, stylesheet and navigation
//! - Page `homepage`: archive form, optional error message
//! - Page `search`: search box and results
//! - Page `archive`: a single archived link

pub mod archive;
pub mod homepage;
pub mod layout;
pub mod search;

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_LAYOUT: &str = "default";

/// Renders a page body from its bound context
pub type PageFn = fn(&Value) -> Result<String, RenderError>;

/// Wraps a rendered page body into a full document
pub type LayoutFn = fn(&str, &Value) -> String;

/// Errors raised while rendering a template
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown layout '{0}'")]
    UnknownLayout(String),
    #[error("unknown page '{0}'")]
    UnknownPage(String),
    #[error("page '{page}' requires field '{field}'")]
    MissingField {
        page: &'static str,
        field: &'static str,
    },
    #[error("template data could not be serialized: {0}")]
    Data(#[from] serde_json::Error),
}

/// Registry of layouts and pages, built once at start-up
#[derive(Debug, Clone)]
pub struct Views {
    layouts: HashMap<&'static str, LayoutFn>,
    pages: HashMap<&'static str, PageFn>,
}

impl Views {
    pub fn new() -> Self {
        let mut views = Self {
            layouts: HashMap::new(),
            pages: HashMap::new(),
        };
        views.layouts.insert(DEFAULT_LAYOUT, layout::render_default);
        views.pages.insert("homepage", homepage::render);
        views.pages.insert("search", search::render);
        views.pages.insert("archive", archive::render);
        views
    }

    /// Render `page` with `data` bound into its context, inside `layout`.
    pub fn render<T: Serialize + ?Sized>(
        &self,
        layout: &str,
        page: &str,
        data: &T,
    ) -> Result<String, RenderError> {
        let layout_fn = self
            .layouts
            .get(layout)
            .ok_or_else(|| RenderError::UnknownLayout(layout.to_string()))?;
        let page_fn = self
            .pages
            .get(page)
            .ok_or_else(|| RenderError::UnknownPage(page.to_string()))?;

        let context = serde_json::to_value(data)?;
        let body = page_fn(&context)?;
        Ok(layout_fn(&body, &context))
    }

    pub fn has_page(&self, page: &str) -> bool {
        self.pages.contains_key(page)
    }
}

impl Default for Views {
    fn default() -> Self {
        Self::new()
    }
}

/// Read an optional string field from a template context. Pages splice it
/// into `maud` markup, which escapes it.
pub(crate) fn text_field<'a>(context: &'a Value, field: &str) -> Option<&'a str> {
    context.get(field).and_then(Value::as_str)
}
