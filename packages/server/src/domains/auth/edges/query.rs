use axum::{extract::Extension, Json};

use crate::common::ApiError;
use crate::domains::users::data::CurrentUserData;
use crate::domains::users::models::User;
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

/// `GET /api/auth/me`
///
/// A valid token for an account that no longer exists is treated as no session.
pub async fn me(
    Extension(state): Extension<AppState>,
    user: AuthUser,
) -> Result<Json<CurrentUserData>, ApiError> {
    let user = User::find_optional(user.user_id, &state.db_pool)
        .await?
        .ok_or(ApiError::AuthenticationRequired)?;

    Ok(Json(CurrentUserData::from(user)))
}
