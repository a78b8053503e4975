use axum::{
    extract::Extension,
    http::StatusCode,
    Json,
};

use crate::common::{ApiError, ApiPath, ToyId, ToyRequestId};
use crate::domains::exchanges::actions;
use crate::domains::exchanges::data::{CreateRequestInput, ToyRequestData, UpdateRequestInput};
use crate::domains::exchanges::models::{RequestStatus, ToyRequest};
use crate::domains::users::data::UserSummary;
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

async fn with_parties(request: ToyRequest, state: &AppState) -> Result<ToyRequestData, ApiError> {
    let parties =
        UserSummary::load_many([request.requester_id, request.owner_id], &state.db_pool).await?;
    Ok(ToyRequestData::from(request).with_parties(&parties))
}

/// `POST /api/toys/:id/requests`
///
/// The body is optional; `{ "message": "..." }` adds a note for the owner.
pub async fn create_request(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    ApiPath(toy_id): ApiPath<ToyId>,
    input: Option<Json<CreateRequestInput>>,
) -> Result<(StatusCode, Json<ToyRequestData>), ApiError> {
    let message = input.and_then(|Json(input)| input.message);
    let request = actions::create_request(
        user.user_id,
        &user.username,
        toy_id,
        message,
        &state.db_pool,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(with_parties(request, &state).await?)))
}

/// `PATCH /api/requests/:id` with `{ "status": "approved" }` etc.
pub async fn update_request(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    ApiPath(request_id): ApiPath<ToyRequestId>,
    Json(input): Json<UpdateRequestInput>,
) -> Result<Json<ToyRequestData>, ApiError> {
    let to: RequestStatus = input
        .status
        .parse()
        .map_err(|e: anyhow::Error| ApiError::validation(e.to_string()))?;

    let request =
        actions::update_request_status(user.user_id, request_id, to, &state.db_pool).await?;
    Ok(Json(with_parties(request, &state).await?))
}
