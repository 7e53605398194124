//! The default document layout shared by every page.

use maud::{DOCTYPE, PreEscaped, html};
use serde_json::Value;

use super::text_field;

pub fn render_default(body: &str, context: &Value) -> String {
    let title = text_field(context, "title").unwrap_or("Link Archive");

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                link rel="icon" href="/static/favicon.svg" type="image/svg+xml";
                link rel="stylesheet" href="/static/css/style.css";
                script src="/static/js/app.js" defer {}
            }
            body {
                header.site-header {
                    a.brand href="/" { "Link Archive" }
                    form.header-search action="/search" method="get" {
                        input type="search" name="q" placeholder="Search archives";
                    }
                }
                main #content {
                    // pages are rendered markup already
                    (PreEscaped(body))
                }
            }
        }
    }
    .into_string()
}
