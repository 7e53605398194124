//! Archive view: one archived link with its derived assets.

use maud::html;
use serde_json::Value;

use super::{RenderError, text_field};

pub fn render(context: &Value) -> Result<String, RenderError> {
    let archive = context.get("archive").ok_or(RenderError::MissingField {
        page: "archive",
        field: "archive",
    })?;
    let slug = text_field(archive, "slug").ok_or(RenderError::MissingField {
        page: "archive",
        field: "archive.slug",
    })?;
    let url = text_field(archive, "url").unwrap_or_default();
    let title = text_field(archive, "title").unwrap_or(url);
    let created_at = text_field(archive, "created_at").unwrap_or_default();
    let has = |field: &str| archive.get(field).is_some_and(|value| !value.is_null());

    Ok(html! {
        h2 { (title) }
        div.archive-container {
            p { "Original: " a href=(url) rel="nofollow" { (url) } }
            p { "Archived: " time { (created_at) } }
            ul.archive-assets {
                @if has("screenshot") {
                    li { a href={ "/" (slug) "/screenshot" } { "Screenshot" } }
                }
                @if has("snapshot") {
                    li { a href={ "/" (slug) "/snapshot" } { "Snapshot" } }
                }
            }
        }
    }
    .into_string())
}
