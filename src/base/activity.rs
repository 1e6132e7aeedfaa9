//! Inbound activity model.
//!
//! These types mirror the JSON the bot connector posts to the activity endpoint. Only the
//! fields the bot reads are modeled; everything else is ignored on deserialization.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{DefaultOnNull, serde_as};

/// Channel-data event type sent when a team is renamed.
pub const TEAM_RENAMED_EVENT_TYPE: &str = "teamRenamed";

/// The kind of an inbound activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityType {
    Message,
    MessageReaction,
    ConversationUpdate,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A user or bot account on the channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelAccount {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aad_object_id: Option<String>,
}

/// The conversation an activity belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationAccount {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

/// A single emoji reaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReaction {
    #[serde(rename = "type", default)]
    pub reaction_type: String,
}

/// Team details carried in channel data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// The channel-specific payload of a Teams activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamsChannelData {
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub team: Option<TeamInfo>,
}

/// An inbound (or outbound) activity.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "type", default)]
    pub activity_type: ActivityType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation: Option<ConversationAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reactions_added: Vec<MessageReaction>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reactions_removed: Vec<MessageReaction>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members_added: Vec<ChannelAccount>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members_removed: Vec<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_data: Option<Value>,
}

impl Activity {
    /// The sender's directory object id, or an empty string.
    pub fn from_aad_object_id(&self) -> &str {
        self.from.as_ref().and_then(|f| f.aad_object_id.as_deref()).unwrap_or_default()
    }

    /// The sender's channel id, or an empty string.
    pub fn from_id(&self) -> &str {
        self.from.as_ref().map(|f| f.id.as_str()).unwrap_or_default()
    }

    /// The id of the message this activity refers to, or an empty string.
    pub fn reply_to_id(&self) -> &str {
        self.reply_to_id.as_deref().unwrap_or_default()
    }

    /// The Teams channel data, if present and well formed.
    pub fn teams_channel_data(&self) -> Option<TeamsChannelData> {
        self.channel_data.as_ref().and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Whether the activity reports a team rename.
    pub fn is_team_renamed(&self) -> bool {
        self.teams_channel_data()
            .and_then(|d| d.event_type)
            .is_some_and(|t| t.eq_ignore_ascii_case(TEAM_RENAMED_EVENT_TYPE))
    }

    /// Whether any account in `members` is someone other than the bot receiving this activity.
    pub fn has_members_other_than_recipient(&self, members: &[ChannelAccount]) -> bool {
        let recipient_id = self.recipient.as_ref().map(|r| r.id.as_str());

        members.iter().any(|m| Some(m.id.as_str()) != recipient_id)
    }

    /// Builds a text message replying to this activity in the same conversation.
    pub fn create_reply(&self, text: &str) -> Activity {
        Activity {
            activity_type: ActivityType::Message,
            service_url: self.service_url.clone(),
            channel_id: self.channel_id.clone(),
            from: self.recipient.clone(),
            recipient: self.from.clone(),
            conversation: self.conversation.clone(),
            text: Some(text.to_string()),
            reply_to_id: self.id.clone(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn deserializes_reaction_activity() {
        let activity: Activity = serde_json::from_value(json!({
            "type": "messageReaction",
            "id": "act-1",
            "serviceUrl": "https://smba.example.com/amer/",
            "from": { "id": "29:abc", "aadObjectId": "aad-1", "name": "Ada" },
            "recipient": { "id": "28:bot" },
            "conversation": { "id": "a:conv", "tenantId": "tenant" },
            "replyToId": "1618000000000",
            "reactionsAdded": [{ "type": "like" }],
            "reactionsRemoved": null,
            "membersAdded": null,
            "someUnknownField": 42
        }))
        .unwrap();

        assert_eq!(activity.activity_type, ActivityType::MessageReaction);
        assert_eq!(activity.from_aad_object_id(), "aad-1");
        assert_eq!(activity.from_id(), "29:abc");
        assert_eq!(activity.reply_to_id(), "1618000000000");
        assert_eq!(activity.reactions_added.len(), 1);
        assert_eq!(activity.reactions_added[0].reaction_type, "like");
        assert!(activity.reactions_removed.is_empty());
        assert!(activity.members_added.is_empty());
    }

    #[test]
    fn unknown_activity_types_map_to_unknown() {
        let activity: Activity = serde_json::from_value(json!({ "type": "invoke" })).unwrap();

        assert_eq!(activity.activity_type, ActivityType::Unknown);
    }

    #[test]
    fn missing_sender_yields_empty_ids() {
        let activity = Activity::default();

        assert_eq!(activity.from_aad_object_id(), "");
        assert_eq!(activity.from_id(), "");
        assert_eq!(activity.reply_to_id(), "");
    }

    #[test]
    fn detects_team_rename_case_insensitively() {
        let mut activity = Activity {
            channel_data: Some(json!({ "eventType": "TEAMRENAMED", "team": { "id": "19:team", "name": "New name" } })),
            ..Default::default()
        };

        assert!(activity.is_team_renamed());
        assert_eq!(activity.teams_channel_data().unwrap().team.unwrap().name.as_deref(), Some("New name"));

        activity.channel_data = Some(json!({ "eventType": "channelCreated" }));
        assert!(!activity.is_team_renamed());

        activity.channel_data = Some(json!("not an object"));
        assert!(!activity.is_team_renamed());

        activity.channel_data = None;
        assert!(!activity.is_team_renamed());
    }

    #[test]
    fn members_other_than_recipient() {
        let activity = Activity {
            recipient: Some(ChannelAccount {
                id: "28:bot".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };

        let bot_only = vec![ChannelAccount {
            id: "28:bot".to_string(),
            ..Default::default()
        }];
        let with_user = vec![
            bot_only[0].clone(),
            ChannelAccount {
                id: "29:user".to_string(),
                ..Default::default()
            },
        ];

        assert!(!activity.has_members_other_than_recipient(&bot_only));
        assert!(activity.has_members_other_than_recipient(&with_user));
        assert!(!activity.has_members_other_than_recipient(&[]));
    }

    #[test]
    fn reply_swaps_parties_and_targets_the_activity() {
        let activity = Activity {
            activity_type: ActivityType::Message,
            id: Some("act-1".to_string()),
            from: Some(ChannelAccount {
                id: "29:user".to_string(),
                ..Default::default()
            }),
            recipient: Some(ChannelAccount {
                id: "28:bot".to_string(),
                ..Default::default()
            }),
            conversation: Some(ConversationAccount {
                id: "a:conv".to_string(),
                ..Default::default()
            }),
            text: Some("hello".to_string()),
            ..Default::default()
        };

        let reply = activity.create_reply("hi back");

        assert_eq!(reply.activity_type, ActivityType::Message);
        assert_eq!(reply.from_id(), "28:bot");
        assert_eq!(reply.recipient.unwrap().id, "29:user");
        assert_eq!(reply.conversation.unwrap().id, "a:conv");
        assert_eq!(reply.reply_to_id.as_deref(), Some("act-1"));
        assert_eq!(reply.text.as_deref(), Some("hi back"));
    }
}
