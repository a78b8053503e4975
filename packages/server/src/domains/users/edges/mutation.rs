use axum::{extract::Extension, Json};

use crate::common::ApiError;
use crate::domains::users::actions::{self, UpdateProfileInput};
use crate::domains::users::data::CurrentUserData;
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

/// `PATCH /api/users/me`
pub async fn update_me(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Json(input): Json<UpdateProfileInput>,
) -> Result<Json<CurrentUserData>, ApiError> {
    let updated =
        actions::update_profile(user.user_id, input, state.geocoder(), &state.db_pool).await?;
    Ok(Json(CurrentUserData::from(updated)))
}
