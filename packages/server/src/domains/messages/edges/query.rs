use axum::{
    extract::Extension,
    Json,
};

use crate::common::{ApiError, ApiPath, UserId};
use crate::domains::messages::actions;
use crate::domains::messages::data::{ConversationData, MessageData, UnreadCountData};
use crate::domains::messages::models::Message;
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

/// `GET /api/messages/conversations`
pub async fn list_conversations(
    Extension(state): Extension<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ConversationData>>, ApiError> {
    let conversations = actions::list_conversations(user.user_id, &state.db_pool).await?;
    Ok(Json(conversations))
}

/// `GET /api/messages/with/:user_id`
pub async fn get_conversation(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    ApiPath(partner_id): ApiPath<UserId>,
) -> Result<Json<Vec<MessageData>>, ApiError> {
    let messages = actions::get_conversation(user.user_id, partner_id, &state.db_pool).await?;
    Ok(Json(messages.into_iter().map(MessageData::from).collect()))
}

/// `GET /api/messages/unread-count`
pub async fn unread_count(
    Extension(state): Extension<AppState>,
    user: AuthUser,
) -> Result<Json<UnreadCountData>, ApiError> {
    let unread_count = Message::count_unread(user.user_id, &state.db_pool).await?;
    Ok(Json(UnreadCountData { unread_count }))
}
