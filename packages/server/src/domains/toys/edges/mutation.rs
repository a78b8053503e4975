use axum::{
    extract::Extension,
    http::StatusCode,
    Json,
};

use crate::common::{ApiError, ApiPath, ToyId};
use crate::domains::toys::actions;
use crate::domains::toys::data::{CreateToyInput, ToyData, UpdateToyInput};
use crate::domains::users::data::UserSummary;
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

/// `POST /api/toys` - the toy always belongs to the caller
pub async fn create_toy(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Json(input): Json<CreateToyInput>,
) -> Result<(StatusCode, Json<ToyData>), ApiError> {
    let toy = actions::create_toy(user.user_id, input, state.geocoder(), &state.db_pool).await?;
    let owners = UserSummary::load_many([toy.user_id], &state.db_pool).await?;

    Ok((StatusCode::CREATED, Json(ToyData::from(toy).with_owner(&owners))))
}

/// `PATCH /api/toys/:id` - owner or admin
pub async fn update_toy(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    ApiPath(toy_id): ApiPath<ToyId>,
    Json(input): Json<UpdateToyInput>,
) -> Result<Json<ToyData>, ApiError> {
    let toy = actions::update_toy(
        user.actor(),
        toy_id,
        input,
        state.geocoder(),
        &state.db_pool,
    )
    .await?;
    let owners = UserSummary::load_many([toy.user_id], &state.db_pool).await?;

    Ok(Json(ToyData::from(toy).with_owner(&owners)))
}

/// `DELETE /api/toys/:id` - owner or admin
pub async fn delete_toy(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    ApiPath(toy_id): ApiPath<ToyId>,
) -> Result<StatusCode, ApiError> {
    actions::delete_toy(user.actor(), toy_id, &state.db_pool).await?;
    Ok(StatusCode::NO_CONTENT)
}
