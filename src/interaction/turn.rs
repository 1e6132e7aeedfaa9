//! Runs a single activity through the bot.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, error, instrument};

use crate::{
    base::{activity::Activity, types::Void},
    service::chat::{ChatClient, TurnContext},
};

use super::handler::ActivityHandler;

/// Handles the activity on its own task.
///
/// Each activity is an independent unit of work; errors are logged and never reach the caller.
#[instrument(skip_all, fields(activity_type = ?activity.activity_type, activity_id = activity.id.as_deref().unwrap_or_default()))]
pub fn handle_activity(activity: Activity, bot: Arc<dyn ActivityHandler>, chat: ChatClient, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(
        async move {
            // Process the activity.
            let result = handle_activity_internal(activity, bot.as_ref(), chat, &cancel).await;

            // Log any errors.
            if let Err(err) = &result {
                error!("Error while handling: {}", err);
            }
        }
        .in_current_span(),
    )
}

async fn handle_activity_internal(activity: Activity, bot: &dyn ActivityHandler, chat: ChatClient, cancel: &CancellationToken) -> Void {
    let context = TurnContext::new(activity, chat);

    bot.on_turn(&context, cancel).await
}
