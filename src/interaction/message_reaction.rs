//! This module records reactions against the sent notifications they were made on.

use std::collections::BTreeMap;

use anyhow::anyhow;
use tracing::{info, instrument, warn};

use crate::{
    base::{activity::Activity, replies, types::Void},
    service::{
        chat::TurnContext,
        db::{NotificationStore, filter::reaction_filter},
        telemetry::TelemetryClient,
    },
};

/// Name of the telemetry event emitted for every reaction activity.
pub const MESSAGE_REACTION_EVENT: &str = "MessageReaction";

/// Handles a reaction activity.
///
/// When reactions were added, the recipient's notification record for the reacted-to message
/// is flagged as reacted. Failures are reported back to the user as text instead of failing
/// the turn. The telemetry event is emitted afterwards whatever the outcome.
#[instrument(skip_all)]
pub async fn handle_message_reaction(context: &TurnContext, store: &NotificationStore, telemetry: &TelemetryClient) -> Void {
    let activity = context.activity();
    let filter = reaction_filter(activity.from_aad_object_id(), activity.reply_to_id());

    let result = if activity.reactions_added.is_empty() {
        Ok(())
    } else {
        match record_reaction(store, &filter).await {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!("Could not record reaction for `{}`: {}", filter, err);
                context.send_text(&replies::reaction_failed(&err)).await
            }
        }
    };

    telemetry.track_event(MESSAGE_REACTION_EVENT, &reaction_properties(activity, &filter));

    result
}

/// Flags the first record matching `filter` as reacted.
///
/// Records are expected to be unique per (user, message); if several match, the first in key
/// order wins.
#[instrument(skip(store))]
pub async fn record_reaction(store: &NotificationStore, filter: &str) -> Void {
    let records = store.get_with_filter(filter).await?;

    if records.len() > 1 {
        warn!("{} records match `{}`; updating the first.", records.len(), filter);
    }

    let mut record = records.into_iter().next().ok_or_else(|| anyhow!("No sent notification matches `{}`.", filter))?;

    record.message_reaction = Some(1);
    store.insert_or_merge(&record).await?;

    info!("Recorded reaction on notification `{}` for `{}`.", record.partition_key, record.row_key);

    Ok(())
}

/// The properties attached to the reaction telemetry event.
pub fn reaction_properties(activity: &Activity, filter: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Filter".to_string(), filter.to_string()),
        ("From.AAD object".to_string(), activity.from_aad_object_id().to_string()),
        ("From.Id".to_string(), activity.from_id().to_string()),
        ("# of Reaction Added".to_string(), activity.reactions_added.len().to_string()),
        ("# of Reaction Removed".to_string(), activity.reactions_removed.len().to_string()),
        ("ReplyToId".to_string(), activity.reply_to_id().to_string()),
    ])
}
