//! # Static Assets Module
//!
//! Serves everything under `/static/`. The backing store is picked once at
//! start-up from the deployment environment:
//!
//! - **development**: `DirectoryAssets`, the local `public/` directory served
//!   through tower-http's `ServeDir` on each request so edits are visible
//!   immediately
//! - **anything else**: `EmbeddedAssets`, the `public/` directory compiled into
//!   the binary; failing to open it aborts start-up
//!
//! Both stores answer with the same content types, so a file present in both
//! yields byte-identical responses.

pub mod directory;
pub mod embedded;
pub mod mime;

use axum::{
    body::Bytes,
    extract::Request,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::info;

use crate::env::AppConfig;

pub use directory::DirectoryAssets;
pub use embedded::EmbeddedAssets;

///////////////////////////////////////////////////////////////////////////////
//****                         Public Types                              ****//
///////////////////////////////////////////////////////////////////////////////

/// A resolved static asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub body: Bytes,
    pub content_type: &'static str,
}

impl Asset {
    pub fn new(path: &str, body: Bytes) -> Self {
        Self {
            body,
            content_type: mime::content_type_for(path),
        }
    }
}

impl IntoResponse for Asset {
    fn into_response(self) -> Response {
        (
            [(header::CONTENT_TYPE, HeaderValue::from_static(self.content_type))],
            self.body,
        )
            .into_response()
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset '{0}' not found")]
    NotFound(String),
    #[error("failed to read asset '{path}' ({status})")]
    Unreadable { path: String, status: StatusCode },
    #[error("embedded asset bundle unavailable: {0}")]
    BundleUnavailable(String),
}

/// Opens a named asset by its path below `/static/`
pub trait AssetSource: Send + Sync {
    fn open(&self, path: &str) -> Result<Asset, AssetError>;
}

/// The asset store chosen for this process
#[derive(Debug, Clone)]
pub enum StaticAssets {
    Directory(DirectoryAssets),
    Embedded(EmbeddedAssets),
}

impl StaticAssets {
    /// Short name of the backing store, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            StaticAssets::Directory(_) => "directory",
            StaticAssets::Embedded(_) => "embedded",
        }
    }

    /// Answer `request` for the decoded asset `path`.
    pub async fn serve(&self, path: &str, request: Request) -> Result<Response, AssetError> {
        match self {
            StaticAssets::Directory(directory) => {
                // Drop the `/static` segment, keeping the rest still encoded.
                let raw_path = match request.uri().path().splitn(3, '/').nth(2) {
                    Some(rest) => format!("/{rest}"),
                    None => return Err(AssetError::NotFound(path.to_string())),
                };
                directory.serve(path, &raw_path, request).await
            }
            StaticAssets::Embedded(bundle) => Ok(bundle.open(path)?.into_response()),
        }
    }
}

///////////////////////////////////////////////////////////////////////////////
//****                       Public Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Pick the asset store for this process from its configuration.
pub fn select_asset_source(config: &AppConfig) -> Result<StaticAssets, AssetError> {
    let assets = if config.environment.is_development() {
        StaticAssets::Directory(DirectoryAssets::new(config.static_dir.clone()))
    } else {
        StaticAssets::Embedded(EmbeddedAssets::new()?)
    };

    info!(
        environment = %config.environment,
        source = assets.kind(),
        "Static asset source selected"
    );
    Ok(assets)
}

/// Split an asset path into safe relative segments.
///
/// Empty paths, `.` and `..` segments, and segments carrying a backslash or a
/// drive separator are reported as not found.
pub(crate) fn sanitize(path: &str) -> Result<Vec<&str>, AssetError> {
    let not_found = || AssetError::NotFound(path.to_string());

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return Err(not_found());
    }

    for segment in &segments {
        if *segment == "." || *segment == ".." || segment.contains(['\\', ':', '\0']) {
            return Err(not_found());
        }
    }

    Ok(segments)
}

///////////////////////////////////////////////////////////////////////////////
//****                              Tests                                ****//
///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Environment;
    use axum::body::Body;
    use http_body_util::BodyExt;

    fn public_dir() -> String {
        concat!(env!("CARGO_MANIFEST_DIR"), "/public").to_string()
    }

    fn request(uri: &str) -> Request {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    async fn body_of(response: Response) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    #[test]
    fn sanitize_rejects_traversal() {
        assert_eq!(sanitize("css/style.css").unwrap(), vec!["css", "style.css"]);
        assert_eq!(sanitize("/css//style.css").unwrap(), vec!["css", "style.css"]);
        assert!(matches!(sanitize(""), Err(AssetError::NotFound(_))));
        assert!(sanitize("../Cargo.toml").is_err());
        assert!(sanitize("css/./style.css").is_err());
        assert!(sanitize("..\\Cargo.toml").is_err());
        assert!(sanitize("C:/Windows").is_err());
    }

    #[tokio::test]
    async fn directory_and_bundle_serve_identical_bytes() {
        let directory = StaticAssets::Directory(DirectoryAssets::new(public_dir()));
        let embedded = StaticAssets::Embedded(EmbeddedAssets::new().unwrap());

        for path in ["css/style.css", "js/app.js", "favicon.svg", "css/high contrast.css"] {
            let uri = format!("/static/{}", path.replace(' ', "%20"));
            let from_disk = directory.serve(path, request(&uri)).await.unwrap();
            let from_bundle = embedded.serve(path, request(&uri)).await.unwrap();

            assert_eq!(
                from_disk.headers().get(header::CONTENT_TYPE),
                from_bundle.headers().get(header::CONTENT_TYPE),
                "{path}"
            );
            assert_eq!(body_of(from_disk).await, body_of(from_bundle).await, "{path}");
        }
    }

    #[tokio::test]
    async fn missing_files_are_not_found_in_both_sources() {
        let directory = StaticAssets::Directory(DirectoryAssets::new(public_dir()));
        let embedded = EmbeddedAssets::new().unwrap();

        for path in ["nope.css", "css", "../Cargo.toml"] {
            let uri = format!("/static/{path}");
            assert!(
                matches!(directory.serve(path, request(&uri)).await, Err(AssetError::NotFound(_))),
                "{path}"
            );
            assert!(matches!(embedded.open(path), Err(AssetError::NotFound(_))), "{path}");
        }
    }

    #[test]
    fn selection_follows_environment() {
        let mut config = AppConfig::default();
        config.static_dir = public_dir().into();

        config.environment = Environment::Development;
        assert_eq!(select_asset_source(&config).unwrap().kind(), "directory");

        config.environment = Environment::Other("production".to_string());
        assert_eq!(select_asset_source(&config).unwrap().kind(), "embedded");
    }
}
