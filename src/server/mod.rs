//! Server module for the Link Archive service.
//!
//! Builds the application from its configuration, binds the listener and runs
//! it until a shutdown signal arrives.
//!
//! # Start-up
//!
//! Both of these are fatal, the process never serves requests without them:
//! - the route table must pass validation
//! - the static asset source for the configured environment must open
//!
//! # Usage
//!
//! ```rust,no_run
//! use linkarchive::env::AppConfig;
//! use linkarchive::server::start_server;
//!
//! # async fn run() -> Result<(), linkarchive::server::ServerError> {
//! start_server(AppConfig::default()).await
//! # }
//! ```

pub mod shutdown;

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

use self::shutdown::ShutdownCoordinator;
use crate::AppState;
use crate::archive::{ArchiveService, MemoryArchiveStore};
use crate::assets::{AssetError, select_asset_source};
use crate::env::AppConfig;
use crate::routing::{RouteTableError, create_route_table, create_router};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid route table: {0}")]
    RouteTable(#[from] RouteTableError),
    #[error("static assets unavailable: {0}")]
    Assets(#[from] AssetError),
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("server error: {0}")]
    Io(#[from] io::Error),
}

///////////////////////////////////////////////////////////////////////////////
//****                       Public Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Build the application router for `config` on top of `archives`.
pub fn build_app(
    config: &AppConfig,
    archives: Arc<dyn ArchiveService>,
) -> Result<Router, ServerError> {
    let routes = create_route_table()?;
    let assets = select_asset_source(config)?;
    info!(routes = routes.routes().len(), "Route table loaded");

    Ok(create_router(AppState::new(archives, assets, routes)))
}

/// Start the Link Archive server with graceful shutdown support
pub async fn start_server(config: AppConfig) -> Result<(), ServerError> {
    let shutdown_coordinator = Arc::new(ShutdownCoordinator::new());
    let app = build_app(&config, Arc::new(MemoryArchiveStore::new()))?;

    let listener = TcpListener::bind(config.bind_address)
        .await
        .map_err(|source| ServerError::Bind {
            address: config.bind_address,
            source,
        })?;
    let addr = listener.local_addr()?;
    info!("Link Archive running on http://{}", addr);

    let signal_coordinator = shutdown_coordinator.clone();
    tokio::spawn(async move {
        signal_coordinator.wait_for_shutdown_signal().await;
    });

    serve(listener, app, shutdown_coordinator.wait_for_shutdown()).await?;
    info!("Link Archive shutdown complete");
    Ok(())
}

/// Serve `app` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
