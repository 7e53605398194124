//! Graceful shutdown coordinator for Link Archive
//!
//! Turns process signals into a single shutdown notification the server (and
//! anything else holding the coordinator) can wait on.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

/// Shutdown coordinator shared by the server and its signal listener
#[derive(Debug, Clone)]
pub struct ShutdownCoordinator {
    /// Atomic flag indicating if shutdown has been initiated
    shutdown_initiated: Arc<AtomicBool>,
    /// Broadcast sender for shutdown signals
    shutdown_tx: broadcast::Sender<()>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(16);

        Self {
            shutdown_initiated: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
        }
    }

    pub fn is_shutdown_initiated(&self) -> bool {
        self.shutdown_initiated.load(Ordering::Relaxed)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Initiate graceful shutdown. Only the first call notifies subscribers.
    pub fn initiate_shutdown(&self) {
        if !self.shutdown_initiated.swap(true, Ordering::Relaxed) {
            info!("Initiating graceful shutdown...");
            if let Err(e) = self.shutdown_tx.send(()) {
                warn!("Failed to send shutdown signal: {}", e);
            }
        }
    }

    /// A future that resolves once shutdown has been initiated, including
    /// when that happened before the future was created.
    pub fn wait_for_shutdown(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut shutdown_rx = self.subscribe();
        let initiated = self.shutdown_initiated.clone();

        async move {
            if initiated.load(Ordering::Relaxed) {
                return;
            }
            let _ = shutdown_rx.recv().await;
        }
    }

    /// Wait for SIGINT or SIGTERM, then initiate shutdown
    pub async fn wait_for_shutdown_signal(&self) {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    error!("Failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received Ctrl+C signal");
            }
            _ = terminate => {
                info!("Received SIGTERM signal");
            }
        }

        self.initiate_shutdown();
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{Duration, timeout};

    #[tokio::test]
    async fn test_shutdown_coordinator_creation() {
        let coordinator = ShutdownCoordinator::new();
        assert!(!coordinator.is_shutdown_initiated());
    }

    #[tokio::test]
    async fn test_shutdown_initiation() {
        let coordinator = ShutdownCoordinator::new();
        let mut receiver = coordinator.subscribe();

        coordinator.initiate_shutdown();
        coordinator.initiate_shutdown();

        assert!(coordinator.is_shutdown_initiated());
        assert!(receiver.recv().await.is_ok());
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_wait_for_shutdown_resolves_after_initiation() {
        let coordinator = ShutdownCoordinator::new();
        let waiter = tokio::spawn(coordinator.wait_for_shutdown());

        let trigger = coordinator.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.initiate_shutdown();
        });

        assert!(timeout(Duration::from_secs(2), waiter).await.is_ok());
    }

    #[tokio::test]
    async fn test_wait_for_shutdown_after_initiation_returns_immediately() {
        let coordinator = ShutdownCoordinator::new();
        coordinator.initiate_shutdown();

        assert!(
            timeout(Duration::from_millis(100), coordinator.wait_for_shutdown())
                .await
                .is_ok()
        );
    }
}
