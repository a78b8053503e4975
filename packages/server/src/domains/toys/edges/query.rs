use axum::{
    extract::{Extension, RawQuery},
    Json,
};
use tracing::info;

use crate::common::{ApiError, ApiPath, ToyId};
use crate::domains::toys::actions::search_toys;
use crate::domains::toys::data::{ToyData, ToyPage};
use crate::domains::toys::filters::ToyFilter;
use crate::domains::toys::models::Toy;
use crate::domains::users::data::UserSummary;
use crate::server::app::AppState;

/// `GET /api/toys` - browse with filters
pub async fn list_toys(
    Extension(state): Extension<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<ToyPage>, ApiError> {
    let filter = ToyFilter::from_query_string(query.as_deref())?;
    info!(
        radius_km = ?filter.radius_km,
        sort = ?filter.sort,
        limit = filter.page.limit,
        offset = filter.page.offset,
        "list_toys query called"
    );

    let page = search_toys(&filter, &state.db_pool).await?;
    Ok(Json(page))
}

/// `GET /api/toys/:id`
pub async fn get_toy(
    Extension(state): Extension<AppState>,
    ApiPath(toy_id): ApiPath<ToyId>,
) -> Result<Json<ToyData>, ApiError> {
    let toy = Toy::find_optional(toy_id, &state.db_pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Toy"))?;
    let owners = UserSummary::load_many([toy.user_id], &state.db_pool).await?;

    Ok(Json(ToyData::from(toy).with_owner(&owners)))
}
