//! Library root for `notify-bot`.
//!
//! Notify-bot is the conversational side of an announcement system. It:
//! - Replies to direct messages with a canned answer
//! - Records when a recipient reacts to a delivered notification
//! - Forwards team lifecycle events (bot added/removed, team renamed) to a capture service
//!
//! The bot receives activities over HTTP, stores delivery records in SurrealDB,
//! and replies through the bot connector. The architecture is built around
//! extensible traits that allow for different implementations of each service.

pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use anyhow::anyhow;
use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the notify-bot runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with the store, reply, telemetry, and capture clients
/// - Serves the activity endpoint
pub async fn start(config: Config) -> Void {
    info!("Starting notify-bot ...");

    // Start the crypto provider.
    crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("A crypto provider was already installed."))?;

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
