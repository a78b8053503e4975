use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::common::{ApiError, ToyId, UserId};
use crate::domains::messages::models::{Message, NewMessage};
use crate::domains::toys::models::Toy;
use crate::domains::users::models::User;

pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Trim and length-check message content
pub fn validate_content(raw: &str) -> Result<String, ApiError> {
    let content = raw.trim();
    if content.is_empty() {
        return Err(ApiError::validation("content is required"));
    }
    if content.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ApiError::validation(format!(
            "content must be at most {} characters",
            MAX_MESSAGE_CHARS
        )));
    }
    Ok(content.to_string())
}

/// Send a direct message, optionally about a toy
pub async fn send_message(
    sender_id: UserId,
    receiver_id: UserId,
    content: &str,
    toy_id: Option<ToyId>,
    pool: &PgPool,
) -> Result<Message> {
    if sender_id == receiver_id {
        return Err(ApiError::validation("You cannot message yourself").into());
    }
    let content = validate_content(content)?;

    if User::find_optional(receiver_id, pool).await?.is_none() {
        return Err(ApiError::not_found("User").into());
    }
    if let Some(toy_id) = toy_id {
        if Toy::find_optional(toy_id, pool).await?.is_none() {
            return Err(ApiError::not_found("Toy").into());
        }
    }

    let mut conn = pool.acquire().await?;
    let message = Message::insert(
        NewMessage {
            sender_id,
            receiver_id,
            toy_id,
            content,
        },
        &mut conn,
    )
    .await?;

    info!(
        message_id = %message.id,
        sender_id = %sender_id,
        receiver_id = %receiver_id,
        "Message sent"
    );
    Ok(message)
}
