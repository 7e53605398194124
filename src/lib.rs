//! # Link Archive
//!
//! A web service that archives links. This crate holds the request routing
//! layer: the ordered route table, the handlers behind it, the response
//! contract they answer with and the static asset store picked per
//! environment.
//!
//! ## Modules
//!
//! - `routing`: route table, dispatcher and path parameter extractors
//! - `web`: handlers, request payloads and HTML views
//! - `response`: the fixed set of response builders
//! - `assets`: the `ServeDir` directory and the embedded static asset sources
//! - `archive`: the archiving service boundary and an in-memory store
//! - `env`, `logging`, `cli`, `server`: configuration and process plumbing

pub mod archive;
pub mod assets;
pub mod cli;
pub mod env;
pub mod logging;
pub mod response;
pub mod routing;
pub mod server;
pub mod web;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use crate::archive::ArchiveService;
use crate::assets::StaticAssets;
use crate::routing::RouteTable;
use crate::web::views::Views;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub archives: Arc<dyn ArchiveService>,
    pub assets: Arc<StaticAssets>,
    pub views: Arc<Views>,
    pub routes: Arc<RouteTable>,
}

impl AppState {
    pub fn new(
        archives: Arc<dyn ArchiveService>,
        assets: StaticAssets,
        routes: RouteTable,
    ) -> Self {
        Self {
            archives,
            assets: Arc::new(assets),
            views: Arc::new(Views::new()),
            routes: Arc::new(routes),
        }
    }
}
