//! Activity dispatch.
//!
//! [`ActivityHandler`] routes an activity to a per-type callback. Every callback has a default;
//! bots override the ones they care about. The defaults for the composite callbacks are also
//! exposed as free functions so an override can still run the built-in routing.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    base::{
        activity::{ActivityType, ChannelAccount, MessageReaction},
        types::Void,
    },
    service::chat::TurnContext,
};

#[async_trait]
pub trait ActivityHandler: Send + Sync + 'static {
    /// Entry point for every inbound activity.
    async fn on_turn(&self, context: &TurnContext, cancel: &CancellationToken) -> Void {
        on_turn_default(self, context, cancel).await
    }

    async fn on_message_activity(&self, _context: &TurnContext, _cancel: &CancellationToken) -> Void {
        Ok(())
    }

    async fn on_message_reaction_activity(&self, context: &TurnContext, cancel: &CancellationToken) -> Void {
        on_message_reaction_default(self, context, cancel).await
    }

    async fn on_reactions_added(&self, _reactions: &[MessageReaction], _context: &TurnContext, _cancel: &CancellationToken) -> Void {
        Ok(())
    }

    async fn on_reactions_removed(&self, _reactions: &[MessageReaction], _context: &TurnContext, _cancel: &CancellationToken) -> Void {
        Ok(())
    }

    async fn on_conversation_update_activity(&self, context: &TurnContext, cancel: &CancellationToken) -> Void {
        on_conversation_update_default(self, context, cancel).await
    }

    async fn on_members_added(&self, _members: &[ChannelAccount], _context: &TurnContext, _cancel: &CancellationToken) -> Void {
        Ok(())
    }

    async fn on_members_removed(&self, _members: &[ChannelAccount], _context: &TurnContext, _cancel: &CancellationToken) -> Void {
        Ok(())
    }

    async fn on_unrecognized_activity(&self, context: &TurnContext, _cancel: &CancellationToken) -> Void {
        debug!("Ignoring activity of type `{:?}`.", context.activity().activity_type);
        Ok(())
    }
}

/// Routes the activity to the callback for its type.
pub async fn on_turn_default<H>(handler: &H, context: &TurnContext, cancel: &CancellationToken) -> Void
where
    H: ActivityHandler + ?Sized,
{
    match context.activity().activity_type {
        ActivityType::Message => handler.on_message_activity(context, cancel).await,
        ActivityType::MessageReaction => handler.on_message_reaction_activity(context, cancel).await,
        ActivityType::ConversationUpdate => handler.on_conversation_update_activity(context, cancel).await,
        ActivityType::Unknown => handler.on_unrecognized_activity(context, cancel).await,
    }
}

/// Fans a reaction activity out to the added/removed callbacks.
pub async fn on_message_reaction_default<H>(handler: &H, context: &TurnContext, cancel: &CancellationToken) -> Void
where
    H: ActivityHandler + ?Sized,
{
    let activity = context.activity();

    if !activity.reactions_added.is_empty() {
        handler.on_reactions_added(&activity.reactions_added, context, cancel).await?;
    }

    if !activity.reactions_removed.is_empty() {
        handler.on_reactions_removed(&activity.reactions_removed, context, cancel).await?;
    }

    Ok(())
}

/// Fans a conversation update out to the membership callbacks.
///
/// Membership callbacks only fire when the list holds someone other than the bot itself.
pub async fn on_conversation_update_default<H>(handler: &H, context: &TurnContext, cancel: &CancellationToken) -> Void
where
    H: ActivityHandler + ?Sized,
{
    let activity = context.activity();

    if activity.has_members_other_than_recipient(&activity.members_added) {
        handler.on_members_added(&activity.members_added, context, cancel).await?;
    }

    if activity.has_members_other_than_recipient(&activity.members_removed) {
        handler.on_members_removed(&activity.members_removed, context, cancel).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::{
        base::activity::Activity,
        service::chat::{ChatClient, GenericChatClient},
    };

    struct NoChat;

    #[async_trait]
    impl GenericChatClient for NoChat {
        async fn send_text(&self, _activity: &Activity, _text: &str) -> Void {
            Ok(())
        }
    }

    /// Records which callbacks ran, in order.
    #[derive(Default)]
    struct Recorder {
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl Recorder {
        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ActivityHandler for Recorder {
        async fn on_message_activity(&self, _context: &TurnContext, _cancel: &CancellationToken) -> Void {
            self.record("message");
            Ok(())
        }

        async fn on_reactions_added(&self, reactions: &[MessageReaction], _context: &TurnContext, _cancel: &CancellationToken) -> Void {
            self.record(format!("reactions_added:{}", reactions.len()));
            Ok(())
        }

        async fn on_reactions_removed(&self, reactions: &[MessageReaction], _context: &TurnContext, _cancel: &CancellationToken) -> Void {
            self.record(format!("reactions_removed:{}", reactions.len()));
            Ok(())
        }

        async fn on_members_added(&self, members: &[ChannelAccount], _context: &TurnContext, _cancel: &CancellationToken) -> Void {
            self.record(format!("members_added:{}", members.len()));
            Ok(())
        }

        async fn on_members_removed(&self, members: &[ChannelAccount], _context: &TurnContext, _cancel: &CancellationToken) -> Void {
            self.record(format!("members_removed:{}", members.len()));
            Ok(())
        }

        async fn on_unrecognized_activity(&self, _context: &TurnContext, _cancel: &CancellationToken) -> Void {
            self.record("unrecognized");
            Ok(())
        }
    }

    fn account(id: &str) -> ChannelAccount {
        ChannelAccount {
            id: id.to_string(),
            ..Default::default()
        }
    }

    fn reaction(kind: &str) -> MessageReaction {
        MessageReaction {
            reaction_type: kind.to_string(),
        }
    }

    async fn run(activity: Activity) -> Vec<String> {
        let recorder = Recorder::default();
        let context = TurnContext::new(activity, ChatClient::new(Arc::new(NoChat)));

        recorder.on_turn(&context, &CancellationToken::new()).await.unwrap();

        recorder.calls()
    }

    #[tokio::test]
    async fn routes_by_activity_type() {
        let message = Activity {
            activity_type: ActivityType::Message,
            ..Default::default()
        };

        assert_eq!(run(message).await, vec!["message"]);
        assert_eq!(run(Activity::default()).await, vec!["unrecognized"]);
    }

    #[tokio::test]
    async fn reaction_default_fans_out_both_lists() {
        let activity = Activity {
            activity_type: ActivityType::MessageReaction,
            reactions_added: vec![reaction("like"), reaction("heart")],
            reactions_removed: vec![reaction("laugh")],
            ..Default::default()
        };

        assert_eq!(run(activity).await, vec!["reactions_added:2", "reactions_removed:1"]);
    }

    #[tokio::test]
    async fn conversation_update_skips_lists_holding_only_the_bot() {
        let activity = Activity {
            activity_type: ActivityType::ConversationUpdate,
            recipient: Some(account("28:bot")),
            members_added: vec![account("28:bot")],
            members_removed: vec![account("29:user")],
            ..Default::default()
        };

        assert_eq!(run(activity).await, vec!["members_removed:1"]);
    }

    #[tokio::test]
    async fn conversation_update_with_users_added() {
        let activity = Activity {
            activity_type: ActivityType::ConversationUpdate,
            recipient: Some(account("28:bot")),
            members_added: vec![account("28:bot"), account("29:user")],
            ..Default::default()
        };

        assert_eq!(run(activity).await, vec!["members_added:2"]);
    }
}
