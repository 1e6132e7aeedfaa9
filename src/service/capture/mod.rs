pub mod http;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{
    base::{activity::Activity, types::Void},
    service::chat::TurnContext,
};

// Traits.

/// Generic team data capture trait that clients must implement.
///
/// The capture service keeps track of the teams the bot is installed in. The bot only
/// forwards the relevant activities; what the service does with them is its own business.
#[async_trait]
pub trait GenericTeamsDataCapture: Send + Sync + 'static {
    /// Called when a team the bot belongs to changed its details (e.g. was renamed).
    async fn on_team_information_updated(&self, activity: &Activity) -> Void;

    /// Called when members (including the bot itself) were added to a conversation.
    async fn on_bot_added(&self, context: &TurnContext, activity: &Activity, cancel: &CancellationToken) -> Void;

    /// Called when members (including the bot itself) were removed from a conversation.
    async fn on_bot_removed(&self, activity: &Activity) -> Void;
}

// Structs.

/// Team data capture client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct TeamsDataCapture {
    inner: Arc<dyn GenericTeamsDataCapture>,
}

impl Deref for TeamsDataCapture {
    type Target = dyn GenericTeamsDataCapture;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl TeamsDataCapture {
    pub fn new(inner: Arc<dyn GenericTeamsDataCapture>) -> Self {
        Self { inner }
    }
}
