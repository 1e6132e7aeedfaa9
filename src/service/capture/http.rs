//! Team data capture over HTTP.
//!
//! Each call posts the activity JSON to a path under the configured capture endpoint.
//! Without an endpoint, calls are logged and skipped.

use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::Url;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::{
    base::{
        activity::Activity,
        config::Config,
        types::{Res, Void},
    },
    service::{append_path, chat::TurnContext},
};

use super::{GenericTeamsDataCapture, TeamsDataCapture};

const TEAM_UPDATED_PATH: [&str; 2] = ["teams", "updated"];
const BOT_ADDED_PATH: [&str; 2] = ["bot", "added"];
const BOT_REMOVED_PATH: [&str; 2] = ["bot", "removed"];

// Extra methods on `TeamsDataCapture` applied by the HTTP implementation.

impl TeamsDataCapture {
    /// Creates a capture client that forwards to the configured endpoint.
    pub fn http(config: &Config) -> Res<Self> {
        let endpoint = config.capture_endpoint.as_deref().map(Url::parse).transpose()?;

        if endpoint.is_none() {
            warn!("No capture endpoint configured; team lifecycle events will not be forwarded.");
        }

        Ok(Self {
            inner: Arc::new(HttpTeamsDataCapture::new(endpoint)),
        })
    }
}

// Structs.

/// HTTP capture client implementation.
#[derive(Clone)]
pub struct HttpTeamsDataCapture {
    http: reqwest::Client,
    endpoint: Option<Url>,
}

impl HttpTeamsDataCapture {
    pub fn new(endpoint: Option<Url>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
        }
    }

    async fn forward(&self, path: &[&str], activity: &Activity) -> Void {
        let Some(endpoint) = &self.endpoint else {
            debug!("Skipping `{}`; no capture endpoint.", path.join("/"));
            return Ok(());
        };

        let url = append_path(endpoint, path)?;

        self.http
            .post(url.clone())
            .json(activity)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| anyhow!("Failed to forward to `{}`: {}", url, e))?;

        Ok(())
    }
}

#[async_trait]
impl GenericTeamsDataCapture for HttpTeamsDataCapture {
    #[instrument(skip_all)]
    async fn on_team_information_updated(&self, activity: &Activity) -> Void {
        self.forward(&TEAM_UPDATED_PATH, activity).await
    }

    #[instrument(skip_all)]
    async fn on_bot_added(&self, _context: &TurnContext, activity: &Activity, _cancel: &CancellationToken) -> Void {
        self.forward(&BOT_ADDED_PATH, activity).await
    }

    #[instrument(skip_all)]
    async fn on_bot_removed(&self, activity: &Activity) -> Void {
        self.forward(&BOT_REMOVED_PATH, activity).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, method, path},
    };

    use super::*;
    use crate::base::activity::ActivityType;

    fn activity() -> Activity {
        Activity {
            activity_type: ActivityType::ConversationUpdate,
            id: Some("act-1".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn forwards_each_call_to_its_path() {
        let server = MockServer::start().await;

        for route in ["/capture/teams/updated", "/capture/bot/removed"] {
            Mock::given(method("POST"))
                .and(path(route))
                .and(body_partial_json(json!({ "type": "conversationUpdate", "id": "act-1" })))
                .respond_with(ResponseTemplate::new(204))
                .expect(1)
                .mount(&server)
                .await;
        }

        let endpoint = Url::parse(&format!("{}/capture/", server.uri())).unwrap();
        let capture = HttpTeamsDataCapture::new(Some(endpoint));

        capture.on_team_information_updated(&activity()).await.unwrap();
        capture.on_bot_removed(&activity()).await.unwrap();
    }

    #[tokio::test]
    async fn surfaces_http_failures() {
        let server = MockServer::start().await;

        Mock::given(method("POST")).respond_with(ResponseTemplate::new(503)).mount(&server).await;

        let capture = HttpTeamsDataCapture::new(Some(Url::parse(&server.uri()).unwrap()));

        assert!(capture.on_bot_removed(&activity()).await.is_err());
    }

    #[tokio::test]
    async fn skips_without_endpoint() {
        let capture = HttpTeamsDataCapture::new(None);

        assert!(capture.on_team_information_updated(&activity()).await.is_ok());
        assert!(capture.on_bot_removed(&activity()).await.is_ok());
    }
}
