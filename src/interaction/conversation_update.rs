use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::{
    base::types::Void,
    service::{capture::TeamsDataCapture, chat::TurnContext},
};

/// Forwards team lifecycle information from a conversation update to the capture service.
///
/// The checks are independent; a single update can trigger several calls.
#[instrument(skip_all)]
pub async fn handle_conversation_update(context: &TurnContext, capture: &TeamsDataCapture, cancel: &CancellationToken) -> Void {
    let activity = context.activity();

    if activity.is_team_renamed() {
        info!("Team renamed; forwarding team information.");
        capture.on_team_information_updated(activity).await?;
    }

    if !activity.members_added.is_empty() {
        info!("{} member(s) added; forwarding.", activity.members_added.len());
        capture.on_bot_added(context, activity, cancel).await?;
    }

    if !activity.members_removed.is_empty() {
        info!("{} member(s) removed; forwarding.", activity.members_removed.len());
        capture.on_bot_removed(activity).await?;
    }

    Ok(())
}
