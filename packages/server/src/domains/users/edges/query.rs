use axum::{
    extract::Extension,
    Json,
};
use std::collections::HashMap;

use crate::common::{ApiError, ApiPath, UserId};
use crate::domains::sustainability::data::SustainabilityData;
use crate::domains::sustainability::models::UserBadge;
use crate::domains::toys::data::ToyData;
use crate::domains::toys::models::Toy;
use crate::domains::users::data::{PublicUserData, UserSummary};
use crate::domains::users::models::User;
use crate::server::app::AppState;

async fn find_user(user_id: UserId, state: &AppState) -> Result<User, ApiError> {
    User::find_optional(user_id, &state.db_pool)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))
}

/// `GET /api/users/:id` - public profile
pub async fn get_user(
    Extension(state): Extension<AppState>,
    ApiPath(user_id): ApiPath<UserId>,
) -> Result<Json<PublicUserData>, ApiError> {
    let user = find_user(user_id, &state).await?;
    Ok(Json(PublicUserData::from(user)))
}

/// `GET /api/users/:id/toys` - every listing, any availability
pub async fn get_user_toys(
    Extension(state): Extension<AppState>,
    ApiPath(user_id): ApiPath<UserId>,
) -> Result<Json<Vec<ToyData>>, ApiError> {
    let user = find_user(user_id, &state).await?;
    let owners: HashMap<_, _> = [(user.id, UserSummary::from(&user))].into_iter().collect();

    let toys = Toy::find_by_user(user_id, &state.db_pool).await?;
    Ok(Json(
        toys.into_iter()
            .map(|toy| ToyData::from(toy).with_owner(&owners))
            .collect(),
    ))
}

/// `GET /api/users/:id/sustainability`
pub async fn get_user_sustainability(
    Extension(state): Extension<AppState>,
    ApiPath(user_id): ApiPath<UserId>,
) -> Result<Json<SustainabilityData>, ApiError> {
    let user = find_user(user_id, &state).await?;
    let badges = UserBadge::find_by_user(user_id, &state.db_pool).await?;

    Ok(Json(SustainabilityData::new(&user, badges)))
}
