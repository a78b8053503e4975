use anyhow::Result;
use sqlx::PgPool;

use crate::common::{ApiError, UserId};
use crate::domains::messages::data::{ConversationData, MessageData};
use crate::domains::messages::models::Message;
use crate::domains::users::data::UserSummary;
use crate::domains::users::models::User;

/// Conversation list with partner summaries and unread counts
pub async fn list_conversations(user_id: UserId, pool: &PgPool) -> Result<Vec<ConversationData>> {
    let rows = Message::find_conversations(user_id, pool).await?;
    let partners = UserSummary::load_many(rows.iter().map(|row| row.partner_id), pool).await?;

    Ok(rows
        .into_iter()
        .filter_map(|row| {
            // Partners deleted mid-request are skipped
            let partner = partners.get(&row.partner_id)?.clone();
            Some(ConversationData {
                partner,
                last_message: MessageData::from(row.last_message),
                unread_count: row.unread_count,
            })
        })
        .collect())
}

/// Full thread with one partner, oldest first
pub async fn get_conversation(
    user_id: UserId,
    partner_id: UserId,
    pool: &PgPool,
) -> Result<Vec<Message>> {
    if User::find_optional(partner_id, pool).await?.is_none() {
        return Err(ApiError::not_found("User").into());
    }
    Message::find_between(user_id, partner_id, pool).await
}
