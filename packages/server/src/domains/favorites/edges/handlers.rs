use axum::{
    extract::Extension,
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::common::{ApiError, ApiPath, ToyId};
use crate::domains::favorites::models::Favorite;
use crate::domains::toys::data::ToyData;
use crate::domains::toys::models::Toy;
use crate::domains::users::data::UserSummary;
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

/// `POST /api/toys/:id/favorite` - idempotent
pub async fn add_favorite(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    ApiPath(toy_id): ApiPath<ToyId>,
) -> Result<StatusCode, ApiError> {
    if Toy::find_optional(toy_id, &state.db_pool).await?.is_none() {
        return Err(ApiError::not_found("Toy"));
    }
    let added = Favorite::add(user.user_id, toy_id, &state.db_pool).await?;
    debug!(user_id = %user.user_id, toy_id = %toy_id, added, "Favorite saved");
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/toys/:id/favorite` - idempotent
pub async fn remove_favorite(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    ApiPath(toy_id): ApiPath<ToyId>,
) -> Result<StatusCode, ApiError> {
    Favorite::remove(user.user_id, toy_id, &state.db_pool).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/favorites`
pub async fn list_favorites(
    Extension(state): Extension<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ToyData>>, ApiError> {
    let toys = Favorite::find_toys(user.user_id, &state.db_pool).await?;
    let owners = UserSummary::load_many(toys.iter().map(|t| t.user_id), &state.db_pool).await?;

    Ok(Json(
        toys.into_iter()
            .map(|toy| ToyData::from(toy).with_owner(&owners))
            .collect(),
    ))
}
