//! The notification bot.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{
    base::types::Void,
    service::{capture::TeamsDataCapture, chat::TurnContext, db::NotificationStore, telemetry::TelemetryClient},
};

use super::{
    conversation_update::handle_conversation_update,
    handler::{ActivityHandler, on_conversation_update_default, on_message_reaction_default},
    message::handle_message,
    message_reaction::handle_message_reaction,
};

/// Activity handler for the notification bot.
///
/// All collaborators are injected; the bot holds no state of its own between turns.
#[derive(Clone)]
pub struct NotificationBot {
    pub store: NotificationStore,
    pub telemetry: TelemetryClient,
    pub capture: TeamsDataCapture,
    pub auto_reply_text: String,
}

impl NotificationBot {
    pub fn new(store: NotificationStore, telemetry: TelemetryClient, capture: TeamsDataCapture, auto_reply_text: impl Into<String>) -> Self {
        Self {
            store,
            telemetry,
            capture,
            auto_reply_text: auto_reply_text.into(),
        }
    }
}

#[async_trait]
impl ActivityHandler for NotificationBot {
    async fn on_message_activity(&self, context: &TurnContext, _cancel: &CancellationToken) -> Void {
        handle_message(context, &self.auto_reply_text).await
    }

    async fn on_message_reaction_activity(&self, context: &TurnContext, cancel: &CancellationToken) -> Void {
        handle_message_reaction(context, &self.store, &self.telemetry).await?;

        on_message_reaction_default(self, context, cancel).await
    }

    async fn on_conversation_update_activity(&self, context: &TurnContext, cancel: &CancellationToken) -> Void {
        on_conversation_update_default(self, context, cancel).await?;

        handle_conversation_update(context, &self.capture, cancel).await
    }
}
