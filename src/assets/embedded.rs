//! Assets compiled into the binary.
//!
//! The `public/` directory is embedded at build time, so a release build is a
//! single self-contained executable.

use std::borrow::Cow;

use axum::body::Bytes;
use rust_embed::RustEmbed;
use tracing::info;

use super::{Asset, AssetError, AssetSource, sanitize};

#[derive(RustEmbed)]
#[folder = "public/"]
struct Bundle;

#[derive(Debug, Clone)]
pub struct EmbeddedAssets {
    files: usize,
}

impl EmbeddedAssets {
    /// Open the embedded bundle. An empty bundle means the binary was packaged
    /// without its assets and is reported as `BundleUnavailable`.
    pub fn new() -> Result<Self, AssetError> {
        let files = Bundle::iter().count();
        if files == 0 {
            return Err(AssetError::BundleUnavailable(
                "no files were embedded from public/".to_string(),
            ));
        }

        info!(files, "Embedded asset bundle loaded");
        Ok(Self { files })
    }

    pub fn len(&self) -> usize {
        self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files == 0
    }
}

impl AssetSource for EmbeddedAssets {
    fn open(&self, path: &str) -> Result<Asset, AssetError> {
        let key = sanitize(path)?.join("/");
        let file = Bundle::get(&key).ok_or_else(|| AssetError::NotFound(path.to_string()))?;

        let body = match file.data {
            Cow::Borrowed(data) => Bytes::from_static(data),
            Cow::Owned(data) => Bytes::from(data),
        };
        Ok(Asset::new(path, body))
    }
}
