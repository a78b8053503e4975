use anyhow::Result;
use sqlx::PgConnection;
use tracing::debug;

use crate::common::UserId;
use crate::domains::sustainability::actions::recompute_user;
use crate::domains::sustainability::models::CommunityMetrics;
use crate::domains::sustainability::scoring::SustainabilitySnapshot;
use crate::domains::users::models::user::User;

/// A toy was listed by `owner_id`
pub async fn record_toy_shared(
    owner_id: UserId,
    conn: &mut PgConnection,
) -> Result<SustainabilitySnapshot> {
    User::adjust_counters(owner_id, 1, 0, &mut *conn).await?;
    let snapshot = recompute_user(owner_id, &mut *conn).await?;
    let totals = CommunityMetrics::adjust(1, 0, &mut *conn).await?;

    debug!(
        owner_id = %owner_id,
        score = snapshot.score,
        total_toys_shared = totals.total_toys_shared,
        "Recorded shared toy"
    );
    Ok(snapshot)
}

/// A toy owned by `owner_id` was deleted
pub async fn record_toy_removed(
    owner_id: UserId,
    conn: &mut PgConnection,
) -> Result<SustainabilitySnapshot> {
    User::adjust_counters(owner_id, -1, 0, &mut *conn).await?;
    let snapshot = recompute_user(owner_id, &mut *conn).await?;
    let totals = CommunityMetrics::adjust(-1, 0, &mut *conn).await?;

    debug!(
        owner_id = %owner_id,
        score = snapshot.score,
        total_toys_shared = totals.total_toys_shared,
        "Recorded removed toy"
    );
    Ok(snapshot)
}

/// An exchange between `owner_id` and `requester_id` was completed
pub async fn record_exchange_completed(
    owner_id: UserId,
    requester_id: UserId,
    conn: &mut PgConnection,
) -> Result<(SustainabilitySnapshot, SustainabilitySnapshot)> {
    // Lock in a stable order so concurrent completions cannot deadlock
    let (first, second) = if owner_id <= requester_id {
        (owner_id, requester_id)
    } else {
        (requester_id, owner_id)
    };
    User::adjust_counters(first, 0, 1, &mut *conn).await?;
    User::adjust_counters(second, 0, 1, &mut *conn).await?;

    let owner = recompute_user(owner_id, &mut *conn).await?;
    let requester = recompute_user(requester_id, &mut *conn).await?;
    let totals = CommunityMetrics::adjust(0, 1, &mut *conn).await?;

    debug!(
        owner_id = %owner_id,
        requester_id = %requester_id,
        total_exchanges = totals.total_exchanges,
        "Recorded completed exchange"
    );
    Ok((owner, requester))
}
