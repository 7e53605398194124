//! Search view: the query box and the matching archives.

use maud::html;
use serde_json::Value;

use super::{RenderError, text_field};

pub fn render(context: &Value) -> Result<String, RenderError> {
    let query = text_field(context, "query").unwrap_or_default();
    let results = context
        .get("results")
        .and_then(Value::as_array)
        .ok_or(RenderError::MissingField {
            page: "search",
            field: "results",
        })?;

    Ok(html! {
        h2 { "Search" }
        form action="/search" method="get" {
            input type="search" name="q" value=(query);
            button type="submit" { "Search" }
        }
        div.search-results {
            @if results.is_empty() {
                p { "No archives found" }
            } @else {
                ul.archive-list {
                    @for archive in results {
                        @let slug = text_field(archive, "slug").unwrap_or_default();
                        @let url = text_field(archive, "url").unwrap_or_default();
                        li {
                            a href={ "/" (slug) } { (text_field(archive, "title").unwrap_or(url)) }
                            " "
                            span.archive-url { (url) }
                        }
                    }
                }
            }
        }
    }
    .into_string())
}
