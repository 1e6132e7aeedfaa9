use tracing::{info, instrument};

use crate::{base::types::Void, service::chat::TurnContext};

/// Answers any plain message with the canned reply.
#[instrument(skip_all)]
pub async fn handle_message(context: &TurnContext, auto_reply_text: &str) -> Void {
    info!("Received message from `{}`; sending auto reply.", context.activity().from_id());

    context.send_text(auto_reply_text).await
}
