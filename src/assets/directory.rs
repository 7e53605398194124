//! Directory-backed assets for development.
//!
//! Files are served from disk by tower-http's `ServeDir`, so edits show up
//! without a rebuild. `ServeDir` decodes the path, refuses traversal and
//! answers conditional and range requests itself.

use std::path::{Path, PathBuf};

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderValue, StatusCode, Uri, header},
    response::Response,
};
use tower::ServiceExt;
use tower_http::services::ServeDir;

use super::{AssetError, mime};
use crate::logging::errors::{ErrorContext, ErrorSeverity, log_error};

#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
    service: ServeDir,
}

impl DirectoryAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        if !root.is_dir() {
            log_error(
                ErrorSeverity::Warning,
                "Static asset directory does not exist yet",
                &ErrorContext::new().with_field("root", root.display().to_string()),
                file!(),
                line!(),
            );
        }

        let service = ServeDir::new(&root).append_index_html_on_directories(false);
        Self { root, service }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serve `request` from the directory. `path` is the decoded asset path
    /// and `raw_path` the still-encoded one below `/static`.
    pub async fn serve(
        &self,
        path: &str,
        raw_path: &str,
        mut request: Request,
    ) -> Result<Response, AssetError> {
        let uri: Uri = raw_path
            .parse()
            .map_err(|_| AssetError::NotFound(path.to_string()))?;
        *request.uri_mut() = uri;

        let response = match self.service.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };

        match response.status() {
            StatusCode::NOT_FOUND => Err(AssetError::NotFound(path.to_string())),
            status if status.is_server_error() => Err(AssetError::Unreadable {
                path: path.to_string(),
                status,
            }),
            status => {
                let mut response = response.map(Body::new);
                if status == StatusCode::OK || status == StatusCode::PARTIAL_CONTENT {
                    response.headers_mut().insert(
                        header::CONTENT_TYPE,
                        HeaderValue::from_static(mime::content_type_for(path)),
                    );
                }
                Ok(response)
            }
        }
    }
}
