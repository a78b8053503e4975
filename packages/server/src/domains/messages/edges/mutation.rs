use axum::{
    extract::Extension,
    http::StatusCode,
    Json,
};

use crate::common::{ApiError, ApiPath, UserId};
use crate::domains::messages::actions;
use crate::domains::messages::data::{MarkReadData, MessageData, SendMessageInput};
use crate::domains::messages::models::Message;
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

/// `POST /api/messages`
pub async fn send_message(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Json(input): Json<SendMessageInput>,
) -> Result<(StatusCode, Json<MessageData>), ApiError> {
    let message = actions::send_message(
        user.user_id,
        input.receiver_id,
        &input.content,
        input.toy_id,
        &state.db_pool,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(MessageData::from(message))))
}

/// `POST /api/messages/with/:user_id/read`
pub async fn mark_conversation_read(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    ApiPath(partner_id): ApiPath<UserId>,
) -> Result<Json<MarkReadData>, ApiError> {
    let marked_read = Message::mark_read_from(user.user_id, partner_id, &state.db_pool).await?;
    Ok(Json(MarkReadData { marked_read }))
}
