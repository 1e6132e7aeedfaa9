//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc};

use serde::Deserialize;

use crate::base::replies;

use super::types::{Res, Void};

/// Default address the activity endpoint listens on.
fn default_listen_address() -> String {
    "0.0.0.0:3978".to_string()
}

/// Default database endpoint (in-memory).
fn default_db_endpoint() -> String {
    "memory".to_string()
}

/// Default database namespace.
fn default_db_namespace() -> String {
    "notify".to_string()
}

/// Default database name.
fn default_db_database() -> String {
    "bot".to_string()
}

/// Default name of the sent notification table.
fn default_sent_notification_table() -> String {
    "SentNotificationData".to_string()
}

/// Default reply to plain messages.
fn default_auto_reply_text() -> String {
    replies::AUTO_REPLY_TEXT.to_string()
}

/// Configuration for the notify-bot application.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigInner {
    /// Address the activity endpoint binds to (`LISTEN_ADDRESS`).
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
    /// Database endpoint URL, or `memory` for an in-process store (`DB_ENDPOINT`).
    #[serde(default = "default_db_endpoint")]
    pub db_endpoint: String,
    /// Database username (`DB_USERNAME`).
    #[serde(default)]
    pub db_username: String,
    /// Database password (`DB_PASSWORD`).
    #[serde(default)]
    pub db_password: String,
    /// Database namespace (`DB_NAMESPACE`).
    #[serde(default = "default_db_namespace")]
    pub db_namespace: String,
    /// Database name (`DB_DATABASE`).
    #[serde(default = "default_db_database")]
    pub db_database: String,
    /// Table holding sent notification records (`SENT_NOTIFICATION_TABLE`).
    #[serde(default = "default_sent_notification_table")]
    pub sent_notification_table: String,
    /// Canned reply to plain messages (`AUTO_REPLY_TEXT`).
    #[serde(default = "default_auto_reply_text")]
    pub auto_reply_text: String,
    /// Bearer token attached to outbound replies (`CONNECTOR_TOKEN`).
    #[serde(default)]
    pub connector_token: Option<String>,
    /// Base URL of the team data capture service (`CAPTURE_ENDPOINT`).
    #[serde(default)]
    pub capture_endpoint: Option<String>,
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("NOTIFY_BOT"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }
}

impl ConfigInner {
    /// Checks values that deserialization alone cannot.
    pub fn validate(&self) -> Void {
        if !is_identifier(&self.sent_notification_table) {
            return Err(anyhow::anyhow!(
                "Sent notification table name `{}` must start with a letter and contain only letters, digits, or underscores.",
                self.sent_notification_table
            ));
        }

        if self.listen_address.parse::<std::net::SocketAddr>().is_err() {
            return Err(anyhow::anyhow!("Listen address `{}` is not a valid socket address.", self.listen_address));
        }

        if self.auto_reply_text.trim().is_empty() {
            return Err(anyhow::anyhow!("Auto reply text must not be empty."));
        }

        Ok(())
    }
}

/// Table names are spliced into schema statements, so they are restricted to plain identifiers.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();

    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic()) && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ConfigInner {
        ConfigInner {
            listen_address: default_listen_address(),
            db_endpoint: default_db_endpoint(),
            db_namespace: default_db_namespace(),
            db_database: default_db_database(),
            sent_notification_table: default_sent_notification_table(),
            auto_reply_text: default_auto_reply_text(),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn rejects_table_names_that_are_not_identifiers() {
        for name in ["", "1Table", "Sent-Data", "Sent Data", "x;REMOVE TABLE y"] {
            let config = ConfigInner {
                sent_notification_table: name.to_string(),
                ..valid_config()
            };

            assert!(config.validate().is_err(), "`{name}` should be rejected");
        }
    }

    #[test]
    fn rejects_bad_listen_address() {
        let config = ConfigInner {
            listen_address: "localhost".to_string(),
            ..valid_config()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_blank_auto_reply() {
        let config = ConfigInner {
            auto_reply_text: "   ".to_string(),
            ..valid_config()
        };

        assert!(config.validate().is_err());
    }
}
