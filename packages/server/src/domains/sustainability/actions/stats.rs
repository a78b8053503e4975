use anyhow::Result;
use sqlx::PgPool;

use crate::domains::sustainability::data::{CommunityStats, LeaderboardEntry};
use crate::domains::sustainability::models::CommunityMetrics;
use crate::domains::toys::models::Toy;
use crate::domains::users::models::User;

pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;
pub const MAX_LEADERBOARD_LIMIT: i64 = 100;

/// Community-wide totals with derived impact estimates
pub async fn community_stats(pool: &PgPool) -> Result<CommunityStats> {
    let metrics = CommunityMetrics::get(pool).await?;
    let total_members = User::count(pool).await?;
    let toys_available = Toy::count_available(pool).await?;

    Ok(CommunityStats::new(metrics, total_members, toys_available))
}

/// Top members by score. `limit` is clamped to 1..=100.
pub async fn leaderboard(limit: Option<i64>, pool: &PgPool) -> Result<Vec<LeaderboardEntry>> {
    let limit = limit
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
        .clamp(1, MAX_LEADERBOARD_LIMIT);
    let users = User::leaderboard(limit, pool).await?;
    Ok(LeaderboardEntry::ranked(users))
}
