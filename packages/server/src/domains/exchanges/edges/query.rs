use axum::{
    extract::{Extension, Query},
    Json,
};
use tracing::info;

use crate::common::ApiError;
use crate::domains::exchanges::actions::{list_requests as list, parse_list_query};
use crate::domains::exchanges::data::{ListRequestsQuery, ToyRequestData};
use crate::domains::users::data::UserSummary;
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

/// `GET /api/requests?role=incoming|outgoing&status=...`
pub async fn list_requests(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Query(query): Query<ListRequestsQuery>,
) -> Result<Json<Vec<ToyRequestData>>, ApiError> {
    let (role, status) = parse_list_query(&query)?;
    info!("list_requests query called: role={:?}, status={:?}", role, status);

    let requests = list(user.user_id, role, status, &state.db_pool).await?;
    let parties = UserSummary::load_many(
        requests
            .iter()
            .flat_map(|r| [r.requester_id, r.owner_id]),
        &state.db_pool,
    )
    .await?;

    Ok(Json(
        requests
            .into_iter()
            .map(|r| ToyRequestData::from(r).with_parties(&parties))
            .collect(),
    ))
}
