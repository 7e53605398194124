//! # Logging Module
//!
//! Centralized logging for the Link Archive service.
//!
//! ## Features
//!
//! - **Subscriber Setup**: One `tracing-subscriber` fmt subscriber with an env filter
//! - **Error Logging**: Structured error events carrying request context, used
//!   by handlers before answering with a generic 500

pub mod errors;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `filter` uses `RUST_LOG` syntax. An unparsable filter falls back to the
/// default level so a typo never silences the service.
pub fn init_tracing(filter: &str) {
    let env_filter = EnvFilter::try_new(filter)
        .unwrap_or_else(|_| EnvFilter::new(crate::env::DEFAULT_LOG_LEVEL));

    // A subscriber may already be installed, e.g. by a test harness.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init();
}
