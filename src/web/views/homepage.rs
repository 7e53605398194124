//! Homepage view: the form for archiving a new link.

use maud::html;
use serde_json::Value;

use super::{RenderError, text_field};

pub fn render(context: &Value) -> Result<String, RenderError> {
    let error = text_field(context, "error");
    let url = text_field(context, "url").unwrap_or_default();

    Ok(html! {
        h2 { "Archive a link" }
        div.archive-container {
            @if let Some(error) = error {
                p.error { (error) }
            }
            form action="/archive" method="post" {
                label for="url" { "URL" }
                input type="url" id="url" name="url" value=(url) required;
                button type="submit" { "Archive" }
            }
        }
    }
    .into_string())
}
