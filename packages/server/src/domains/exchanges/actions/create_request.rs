use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::common::{ApiError, ToyId, UserId};
use crate::domains::exchanges::models::{NewToyRequest, ToyRequest};
use crate::domains::messages::models::{Message, NewMessage};
use crate::domains::toys::models::Toy;

pub const MAX_REQUEST_MESSAGE_CHARS: usize = 1000;

/// Text of the message the owner receives for a new request
pub fn announcement(requester_username: &str, toy_title: &str, note: Option<&str>) -> String {
    let mut text = format!(
        "{} would like to exchange for your toy \"{}\".",
        requester_username, toy_title
    );
    if let Some(note) = note {
        text.push_str("\n\n");
        text.push_str(note);
    }
    text
}

/// Ask the owner of `toy_id` for an exchange.
///
/// The owner is notified with a message in the same transaction.
pub async fn create_request(
    requester_id: UserId,
    requester_username: &str,
    toy_id: ToyId,
    message: Option<String>,
    pool: &PgPool,
) -> Result<ToyRequest> {
    let message = message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());
    if let Some(ref m) = message {
        if m.chars().count() > MAX_REQUEST_MESSAGE_CHARS {
            return Err(ApiError::validation(format!(
                "message must be at most {} characters",
                MAX_REQUEST_MESSAGE_CHARS
            ))
            .into());
        }
    }

    let mut tx = pool.begin().await?;

    let toy = Toy::lock_by_id(toy_id, &mut tx)
        .await?
        .ok_or_else(|| ApiError::not_found("Toy"))?;

    if toy.user_id == requester_id {
        return Err(ApiError::validation("You cannot request your own toy").into());
    }
    if !toy.is_available {
        return Err(ApiError::conflict("This toy is no longer available").into());
    }
    if ToyRequest::has_open_request(toy_id, requester_id, &mut tx).await? {
        return Err(ApiError::conflict("You already have an open request for this toy").into());
    }

    let request = ToyRequest::insert(
        NewToyRequest {
            toy_id,
            toy_title: toy.title.clone(),
            requester_id,
            owner_id: toy.user_id,
            message: message.clone(),
        },
        &mut tx,
    )
    .await?;

    Message::insert(
        NewMessage {
            sender_id: requester_id,
            receiver_id: toy.user_id,
            toy_id: Some(toy_id),
            content: announcement(requester_username, &toy.title, message.as_deref()),
        },
        &mut tx,
    )
    .await?;

    tx.commit().await?;

    info!(
        request_id = %request.id,
        toy_id = %toy_id,
        requester_id = %requester_id,
        owner_id = %toy.user_id,
        "Exchange requested"
    );
    Ok(request)
}
