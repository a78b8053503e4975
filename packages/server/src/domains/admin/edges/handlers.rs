use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::common::pagination::{DEFAULT_LIMIT, MAX_LIMIT};
use crate::common::{ApiError, ApiPath, Capability, PageParams, ToyId};
use crate::domains::sustainability::actions::community_stats;
use crate::domains::sustainability::data::CommunityStats;
use crate::domains::toys::actions::delete_toy;
use crate::domains::users::data::AdminUserData;
use crate::domains::users::models::User;
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

/// `GET /api/admin/users?limit=&offset=`
pub async fn list_users(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<AdminUserData>>, ApiError> {
    user.actor().can(Capability::ViewAllUsers).check()?;

    let page = params.validate(DEFAULT_LIMIT, MAX_LIMIT)?;
    let users = User::find_all(page, &state.db_pool).await?;

    Ok(Json(users.into_iter().map(AdminUserData::from).collect()))
}

/// `DELETE /api/admin/toys/:id` - moderation removal of any listing
pub async fn remove_toy(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    ApiPath(toy_id): ApiPath<ToyId>,
) -> Result<StatusCode, ApiError> {
    user.actor().can(Capability::ModerateToys).check()?;

    delete_toy(user.actor(), toy_id, &state.db_pool).await?;
    info!(admin_id = %user.user_id, toy_id = %toy_id, "Admin removed toy");

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/admin/stats`
pub async fn stats(
    Extension(state): Extension<AppState>,
    user: AuthUser,
) -> Result<Json<CommunityStats>, ApiError> {
    user.actor().can(Capability::ViewAllUsers).check()?;

    let stats = community_stats(&state.db_pool).await?;
    Ok(Json(stats))
}
