//! Bot connector reply client.
//!
//! Replies are posted to the service URL that came in on the activity, using the connector
//! REST shape `POST {serviceUrl}/v3/conversations/{conversationId}/activities/{activityId}`.

use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, instrument};

use crate::{
    base::{
        activity::Activity,
        config::Config,
        types::{Res, Void},
    },
    service::append_path,
};

use super::{ChatClient, GenericChatClient};

// Extra methods on `ChatClient` applied by the connector implementation.

impl ChatClient {
    /// Creates a new connector chat client.
    pub fn connector(config: &Config) -> Self {
        Self {
            inner: Arc::new(ConnectorChatClient::new(config.connector_token.clone())),
        }
    }
}

// Structs.

/// Connector client implementation.
#[derive(Clone)]
pub struct ConnectorChatClient {
    http: reqwest::Client,
    token: Option<String>,
}

impl ConnectorChatClient {
    pub fn new(token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token,
        }
    }

    /// The URL a reply to `activity` is posted to.
    fn reply_url(activity: &Activity) -> Res<Url> {
        let service_url = activity.service_url.as_deref().ok_or_else(|| anyhow!("Activity has no service URL to reply to."))?;
        let conversation_id = activity
            .conversation
            .as_ref()
            .map(|c| c.id.as_str())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| anyhow!("Activity has no conversation to reply to."))?;

        let base = Url::parse(service_url)?;
        let mut segments = vec!["v3", "conversations", conversation_id, "activities"];

        if let Some(id) = activity.id.as_deref() {
            segments.push(id);
        }

        append_path(&base, &segments)
    }
}

#[async_trait]
impl GenericChatClient for ConnectorChatClient {
    #[instrument(skip(self, activity))]
    async fn send_text(&self, activity: &Activity, text: &str) -> Void {
        let url = Self::reply_url(activity)?;
        let reply = activity.create_reply(text);

        let mut request = self.http.post(url.clone()).json(&reply);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| anyhow!("Failed to send reply: {}", e))?;

        debug!("Reply posted to `{}`.", url);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, header, method, path},
    };

    use super::*;
    use crate::base::activity::{ChannelAccount, ConversationAccount};

    fn activity(service_url: &str) -> Activity {
        Activity {
            id: Some("act-1".to_string()),
            service_url: Some(service_url.to_string()),
            from: Some(ChannelAccount {
                id: "29:user".to_string(),
                ..Default::default()
            }),
            recipient: Some(ChannelAccount {
                id: "28:bot".to_string(),
                ..Default::default()
            }),
            conversation: Some(ConversationAccount {
                id: "conv-1".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn reply_url_targets_the_activity() {
        let url = ConnectorChatClient::reply_url(&activity("https://smba.example.com/amer/")).unwrap();

        assert_eq!(url.as_str(), "https://smba.example.com/amer/v3/conversations/conv-1/activities/act-1");
    }

    #[test]
    fn reply_url_keeps_conversation_id_in_one_segment() {
        let mut activity = activity("https://smba.example.com");
        activity.conversation.as_mut().unwrap().id = "19:abc/def".to_string();
        activity.id = None;

        let url = ConnectorChatClient::reply_url(&activity).unwrap();

        assert_eq!(url.as_str(), "https://smba.example.com/v3/conversations/19:abc%2Fdef/activities");
    }

    #[test]
    fn reply_url_needs_service_url_and_conversation() {
        let mut missing_service = activity("https://smba.example.com");
        missing_service.service_url = None;
        assert!(ConnectorChatClient::reply_url(&missing_service).is_err());

        let mut missing_conversation = activity("https://smba.example.com");
        missing_conversation.conversation = None;
        assert!(ConnectorChatClient::reply_url(&missing_conversation).is_err());
    }

    #[tokio::test]
    async fn posts_reply_with_token() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v3/conversations/conv-1/activities/act-1"))
            .and(header("authorization", "Bearer secret"))
            .and(body_partial_json(json!({
                "type": "message",
                "text": "hello",
                "replyToId": "act-1",
                "from": { "id": "28:bot" },
                "recipient": { "id": "29:user" },
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = ConnectorChatClient::new(Some("secret".to_string()));

        client.send_text(&activity(&server.uri()), "hello").await.unwrap();
    }

    #[tokio::test]
    async fn surfaces_http_failures() {
        let server = MockServer::start().await;

        Mock::given(method("POST")).respond_with(ResponseTemplate::new(500)).mount(&server).await;

        let client = ConnectorChatClient::new(None);

        assert!(client.send_text(&activity(&server.uri()), "hello").await.is_err());
    }
}
