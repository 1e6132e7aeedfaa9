use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::base::types::{Res, Void};

pub mod filter;
pub mod surreal;

// Traits.

/// Generic sent notification store trait that backends must implement.
///
/// This trait defines the data access the bot needs for notification delivery records.
/// Implementing this trait allows different table backends to be used with the notify-bot.
#[async_trait]
pub trait GenericNotificationStore: Send + Sync + 'static {
    /// Creates the backing table if it does not exist yet.
    ///
    /// This is idempotent and never touches existing records. It must run before any other
    /// operation in a deployment.
    async fn ensure_table_exists(&self) -> Void;

    /// Returns every record matching the filter expression (e.g. `RowKey eq 'U1' and MessageId eq 'M1'`).
    ///
    /// Faults are logged and then returned unchanged.
    async fn get_with_filter(&self, filter: &str) -> Res<Vec<NotificationRecord>>;

    /// Gets a single record by its identity.
    async fn get(&self, partition_key: &str, row_key: &str) -> Res<Option<NotificationRecord>>;

    /// Inserts the record, or merges its set fields into the existing record with the same identity.
    async fn insert_or_merge(&self, record: &NotificationRecord) -> Void;
}

/// Sent notification store for notify-bot.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct NotificationStore {
    /// The store instance.
    pub inner: Arc<dyn GenericNotificationStore>,
}

impl Deref for NotificationStore {
    type Target = dyn GenericNotificationStore;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}

impl NotificationStore {
    pub fn new(inner: Arc<dyn GenericNotificationStore>) -> Self {
        Self { inner }
    }
}

// Data types.

/// A notification delivery record.
///
/// Identity is (`PartitionKey`, `RowKey`): the notification id and the recipient's user id.
/// Unset optional fields are not serialized, so an insert-or-merge leaves them untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NotificationRecord {
    pub partition_key: String,
    pub row_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// `1` once the recipient has reacted to the delivering message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_reaction: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_date: Option<DateTime<Utc>>,
}

impl NotificationRecord {
    pub fn new(partition_key: impl Into<String>, row_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
            ..Default::default()
        }
    }

    pub fn has_reaction(&self) -> bool {
        self.message_reaction == Some(1)
    }
}
