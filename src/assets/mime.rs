//! Content types for static assets, keyed by file extension.

use std::path::Path;

/// Content type of an asset path, falling back to `application/octet-stream`.
///
/// ```
/// use linkarchive::assets::mime::content_type_for;
/// assert_eq!(content_type_for("css/style.css"), "text/css; charset=utf-8");
/// assert_eq!(content_type_for("img/LOGO.PNG"), "image/png");
/// assert_eq!(content_type_for("LICENSE"), "application/octet-stream");
/// ```
pub fn content_type_for(path: &str) -> &'static str {
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        // Documents and text
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("txt") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",
        Some("pdf") => "application/pdf",

        // Scripts and data
        Some("js" | "mjs") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("map") => "application/json",
        Some("wasm") => "application/wasm",

        // Images, including captured screenshots
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        _ => "application/octet-stream",
    }
}
