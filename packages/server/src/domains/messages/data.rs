use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{MessageId, ToyId, UserId};
use crate::domains::messages::models::Message;
use crate::domains::users::data::UserSummary;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageData {
    pub id: MessageId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub toy_id: Option<ToyId>,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageData {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            toy_id: message.toy_id,
            content: message.content,
            is_read: message.is_read,
            created_at: message.created_at,
        }
    }
}

/// Conversation list entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationData {
    pub partner: UserSummary,
    pub last_message: MessageData,
    pub unread_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageInput {
    #[serde(alias = "receiver_id")]
    pub receiver_id: UserId,
    pub content: String,
    #[serde(default, alias = "toy_id")]
    pub toy_id: Option<ToyId>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountData {
    pub unread_count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadData {
    pub marked_read: u64,
}
