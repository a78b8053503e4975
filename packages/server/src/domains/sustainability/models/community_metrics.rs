use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

/// Singleton row of running community totals
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct CommunityMetrics {
    pub total_toys_shared: i64,
    pub total_exchanges: i64,
    pub updated_at: DateTime<Utc>,
}

impl CommunityMetrics {
    pub async fn get(pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "SELECT total_toys_shared, total_exchanges, updated_at
             FROM community_metrics WHERE id = 1",
        )
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Add deltas to the running totals, flooring at zero
    pub async fn adjust(
        toys_delta: i64,
        exchanges_delta: i64,
        conn: &mut PgConnection,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE community_metrics
             SET total_toys_shared = GREATEST(0, total_toys_shared + $1),
                 total_exchanges = GREATEST(0, total_exchanges + $2),
                 updated_at = NOW()
             WHERE id = 1
             RETURNING total_toys_shared, total_exchanges, updated_at",
        )
        .bind(toys_delta)
        .bind(exchanges_delta)
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    /// Recount the totals from the source tables
    pub async fn rebuild(conn: &mut PgConnection) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE community_metrics
             SET total_toys_shared = (SELECT COUNT(*) FROM toys),
                 total_exchanges = (
                     SELECT COUNT(*) FROM toy_requests WHERE status = 'completed'
                 ),
                 updated_at = NOW()
             WHERE id = 1
             RETURNING total_toys_shared, total_exchanges, updated_at",
        )
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }
}
