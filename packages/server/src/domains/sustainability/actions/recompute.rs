use anyhow::Result;
use serde::Serialize;
use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument};

use crate::common::UserId;
use crate::domains::sustainability::models::{CommunityMetrics, UserBadge};
use crate::domains::sustainability::scoring::SustainabilitySnapshot;
use crate::domains::users::models::user::User;

/// Recompute a user's score and badge from their current counters.
///
/// Also records every tier reached so far in the badge history.
#[instrument(skip(conn))]
pub async fn recompute_user(
    user_id: UserId,
    conn: &mut PgConnection,
) -> Result<SustainabilitySnapshot> {
    let counters = User::lock_counters(user_id, &mut *conn).await?;
    let snapshot =
        SustainabilitySnapshot::from_counters(counters.toys_shared, counters.successful_exchanges);

    User::set_sustainability(user_id, snapshot.score, snapshot.badge.as_str(), &mut *conn).await?;
    let awarded = UserBadge::award_through(user_id, snapshot.badge, &mut *conn).await?;

    if counters.current_badge != snapshot.badge.as_str() {
        info!(
            user_id = %user_id,
            from = %counters.current_badge,
            to = %snapshot.badge,
            score = snapshot.score,
            "Badge tier changed"
        );
    }
    for badge in &awarded {
        info!(user_id = %user_id, badge = %badge.badge, "Badge awarded");
    }

    Ok(snapshot)
}

/// Outcome of a full rebuild
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecomputeSummary {
    pub users: u64,
    pub total_toys_shared: i64,
    pub total_exchanges: i64,
}

/// Rebuild every counter, score, badge and community total from the source tables
#[instrument(skip(pool))]
pub async fn recompute_all(pool: &PgPool) -> Result<RecomputeSummary> {
    let mut tx = pool.begin().await?;

    let users = User::rebuild_counters(&mut tx).await?;
    for user_id in User::all_ids(&mut tx).await? {
        recompute_user(user_id, &mut tx).await?;
    }
    let metrics = CommunityMetrics::rebuild(&mut tx).await?;

    tx.commit().await?;

    info!(
        users,
        total_toys_shared = metrics.total_toys_shared,
        total_exchanges = metrics.total_exchanges,
        "Sustainability metrics rebuilt"
    );

    Ok(RecomputeSummary {
        users,
        total_toys_shared: metrics.total_toys_shared,
        total_exchanges: metrics.total_exchanges,
    })
}
