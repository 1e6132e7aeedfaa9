pub mod connector;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::{activity::Activity, types::Void};

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This trait defines how the bot talks back to the conversation an activity came from.
/// Implementing this trait allows different delivery mechanisms to be used with the notify-bot.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Send a text reply to the conversation the activity came from.
    async fn send_text(&self, activity: &Activity, text: &str) -> Void;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }
}

/// The state of a single turn: the inbound activity and a way to answer it.
#[derive(Clone)]
pub struct TurnContext {
    activity: Activity,
    chat: ChatClient,
}

impl TurnContext {
    pub fn new(activity: Activity, chat: ChatClient) -> Self {
        Self { activity, chat }
    }

    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    /// Replies to the inbound activity with free text.
    pub async fn send_text(&self, text: &str) -> Void {
        self.chat.send_text(&self.activity, text).await
    }
}
