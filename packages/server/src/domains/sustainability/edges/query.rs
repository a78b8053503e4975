use axum::{
    extract::{Extension, Query},
    Json,
};
use serde::Deserialize;

use crate::common::ApiError;
use crate::domains::sustainability::actions;
use crate::domains::sustainability::data::{CommunityStats, LeaderboardEntry};
use crate::server::app::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<i64>,
}

/// `GET /api/sustainability/leaderboard?limit=10`
pub async fn get_leaderboard(
    Extension(state): Extension<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let entries = actions::leaderboard(query.limit, &state.db_pool).await?;
    Ok(Json(entries))
}

/// `GET /api/sustainability/community`
pub async fn get_community_stats(
    Extension(state): Extension<AppState>,
) -> Result<Json<CommunityStats>, ApiError> {
    let stats = actions::community_stats(&state.db_pool).await?;
    Ok(Json(stats))
}
