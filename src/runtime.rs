//! Runtime services and shared state for the notify-bot.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    interaction::{bot::NotificationBot, endpoint},
    service::{capture::TeamsDataCapture, chat::ChatClient, db::NotificationStore, telemetry::TelemetryClient},
};

/// Runtime service context that can be shared across the application.
///
/// This struct is the composition root: every collaborator handle is built here once and
/// handed to the bot. It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The sent notification store.
    pub db: NotificationStore,
    /// The reply client.
    pub chat: ChatClient,
    /// The telemetry sink.
    pub telemetry: TelemetryClient,
    /// The team data capture client.
    pub capture: TeamsDataCapture,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Initialize the database, and make sure the table is there before anything uses it.
        let db = NotificationStore::surreal(&config).await?;
        db.ensure_table_exists().await?;

        // Initialize the outbound clients.
        let chat = ChatClient::connector(&config);
        let telemetry = TelemetryClient::tracing();
        let capture = TeamsDataCapture::http(&config)?;

        Ok(Self {
            config,
            db,
            chat,
            telemetry,
            capture,
        })
    }

    /// The bot, wired to this runtime's services.
    pub fn bot(&self) -> NotificationBot {
        NotificationBot::new(self.db.clone(), self.telemetry.clone(), self.capture.clone(), self.config.auto_reply_text.clone())
    }

    /// The activity endpoint router.
    pub fn router(&self, shutdown: CancellationToken) -> Router {
        endpoint::router(Arc::new(self.bot()), self.chat.clone(), shutdown)
    }

    /// Serve the activity endpoint until Ctrl-C.
    pub async fn start(&self) -> Void {
        let shutdown = CancellationToken::new();

        let listener = TcpListener::bind(&self.config.listen_address).await?;
        info!("Listening for activities on `{}`.", listener.local_addr()?);

        // Cancel the root token on Ctrl-C; in-flight turns see it through their child tokens.
        let signal = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Shutting down ..."),
                Err(err) => warn!("Failed to listen for Ctrl-C: {}", err),
            }

            signal.cancel();
        });

        let graceful = shutdown.clone();
        axum::serve(listener, self.router(shutdown))
            .with_graceful_shutdown(async move { graceful.cancelled().await })
            .await?;

        Ok(())
    }
}
