//! SurrealDB implementation of the sent notification store.

use std::{collections::BTreeMap, sync::Arc};

use anyhow::anyhow;
use async_trait::async_trait;
use serde::{Deserialize, de::IgnoredAny};
use surrealdb::{
    Surreal,
    engine::any::{self, Any},
    opt::auth::Root,
};
use tracing::{debug, error, info, instrument, warn};

use crate::base::{
    config::{Config, is_identifier},
    types::{Res, Void},
};

use super::{
    GenericNotificationStore, NotificationRecord, NotificationStore,
    filter::{Filter, Literal},
};

// Extra methods on `NotificationStore` applied by the surreal implementation.

impl NotificationStore {
    /// Connects to the configured SurrealDB instance.
    pub async fn surreal(config: &Config) -> Res<Self> {
        let store = SurrealNotificationStore::new(config).await?;
        Ok(Self { inner: Arc::new(store) })
    }

    /// Creates an in-memory store, used for tests and local runs.
    pub async fn surreal_memory(table: &str) -> Res<Self> {
        let store = SurrealNotificationStore::memory(table).await?;
        Ok(Self { inner: Arc::new(store) })
    }
}

// Structs.

/// The part of `INFO FOR DB` the store reads.
#[derive(Debug, Deserialize)]
struct DbInfo {
    #[serde(default)]
    tables: BTreeMap<String, IgnoredAny>,
}

/// SurrealDB store implementation.
#[derive(Clone)]
pub struct SurrealNotificationStore {
    db: Surreal<Any>,
    table: String,
}

impl SurrealNotificationStore {
    /// Create a store from the configuration.
    ///
    /// An endpoint of `memory` creates an in-process database; anything else is treated as a
    /// remote endpoint and signed into with the configured root credentials.
    #[instrument(name = "SurrealNotificationStore::new", skip_all)]
    pub async fn new(config: &Config) -> Res<Self> {
        if !is_identifier(&config.sent_notification_table) {
            return Err(anyhow!("Invalid table name `{}`.", config.sent_notification_table));
        }

        let db = if config.db_endpoint == "memory" {
            any::connect("mem://").await?
        } else {
            let db = any::connect(config.db_endpoint.as_str()).await?;

            db.signin(Root {
                username: &config.db_username,
                password: &config.db_password,
            })
            .await?;

            db
        };

        db.use_ns(&config.db_namespace).use_db(&config.db_database).await?;

        info!("Connected to database at `{}`.", config.db_endpoint);

        Ok(Self {
            db,
            table: config.sent_notification_table.clone(),
        })
    }

    /// Create an in-memory store for the given table.
    pub async fn memory(table: &str) -> Res<Self> {
        if !is_identifier(table) {
            return Err(anyhow!("Invalid table name `{}`.", table));
        }

        let db = any::connect("mem://").await?;
        db.use_ns("notify").use_db("bot").await?;

        Ok(Self { db, table: table.to_string() })
    }

    async fn table_exists(&self) -> Res<bool> {
        let mut response = self.db.query("INFO FOR DB").await?.check()?;
        let info: Option<DbInfo> = response.take(0)?;

        Ok(info.is_some_and(|i| i.tables.contains_key(&self.table)))
    }

    async fn create_table(&self) -> Void {
        // The name was validated as an identifier on construction.
        self.db.query(format!("DEFINE TABLE IF NOT EXISTS {} SCHEMALESS", self.table)).await?.check()?;

        Ok(())
    }

    async fn query_with_filter(&self, filter: &str) -> Res<Vec<NotificationRecord>> {
        let filter: Filter = filter.parse()?;

        let mut params = BTreeMap::<String, Literal>::new();
        let condition = filter.to_surql(&mut params);

        let query = format!("SELECT * OMIT id FROM type::table($tb) WHERE {condition} ORDER BY PartitionKey, RowKey");

        let mut response = self.db.query(query).bind(("tb", self.table.clone())).bind(params).await?.check()?;
        let records: Vec<NotificationRecord> = response.take(0)?;

        Ok(records)
    }
}

#[async_trait]
impl GenericNotificationStore for SurrealNotificationStore {
    #[instrument(skip(self))]
    async fn ensure_table_exists(&self) -> Void {
        let result: Void = async {
            if self.table_exists().await? {
                debug!("Table `{}` already exists.", self.table);
                return Ok(());
            }

            info!("Table `{}` not found, creating it.", self.table);
            self.create_table().await
        }
        .await;

        if let Err(err) = &result {
            error!("Failed to ensure table `{}` exists: {}", self.table, err);
        }

        result
    }

    #[instrument(skip(self))]
    async fn get_with_filter(&self, filter: &str) -> Res<Vec<NotificationRecord>> {
        let result = self.query_with_filter(filter).await;

        match &result {
            Ok(records) => debug!("Filter matched {} record(s).", records.len()),
            Err(err) => error!("Failed to query `{}` with filter `{}`: {}", self.table, filter, err),
        }

        result
    }

    #[instrument(skip(self))]
    async fn get(&self, partition_key: &str, row_key: &str) -> Res<Option<NotificationRecord>> {
        let mut response = self
            .db
            .query("SELECT * OMIT id FROM type::thing($tb, [$partition_key, $row_key])")
            .bind(("tb", self.table.clone()))
            .bind(("partition_key", partition_key.to_string()))
            .bind(("row_key", row_key.to_string()))
            .await?
            .check()?;

        let records: Vec<NotificationRecord> = response.take(0)?;

        Ok(records.into_iter().next())
    }

    #[instrument(skip_all, fields(partition_key = %record.partition_key, row_key = %record.row_key))]
    async fn insert_or_merge(&self, record: &NotificationRecord) -> Void {
        if record.partition_key.is_empty() || record.row_key.is_empty() {
            warn!("Refusing to write a record without a full identity.");
            return Err(anyhow!("A notification record needs both a partition key and a row key."));
        }

        self.db
            .query("UPSERT type::thing($tb, [$partition_key, $row_key]) MERGE $data RETURN NONE")
            .bind(("tb", self.table.clone()))
            .bind(("partition_key", record.partition_key.clone()))
            .bind(("row_key", record.row_key.clone()))
            .bind(("data", record.clone()))
            .await?
            .check()?;

        Ok(())
    }
}

// Tests.
