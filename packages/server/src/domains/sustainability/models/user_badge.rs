use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::common::UserId;
use crate::domains::sustainability::scoring::Badge;

/// A badge tier a user has reached at some point
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct UserBadge {
    pub user_id: UserId,
    pub badge: String,
    pub awarded_at: DateTime<Utc>,
}

impl UserBadge {
    /// Badges earned by a user, in the order they were awarded
    pub async fn find_by_user(user_id: UserId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM user_badges
             WHERE user_id = $1
             ORDER BY awarded_at ASC, badge ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Record `badge` and every tier below it. Returns only newly awarded rows.
    pub async fn award_through(
        user_id: UserId,
        badge: Badge,
        conn: &mut PgConnection,
    ) -> Result<Vec<Self>> {
        let badges: Vec<String> = badge.earned_through().map(|b| b.to_string()).collect();

        sqlx::query_as::<_, Self>(
            "INSERT INTO user_badges (user_id, badge)
             SELECT $1, b FROM UNNEST($2::text[]) AS b
             ON CONFLICT (user_id, badge) DO NOTHING
             RETURNING *",
        )
        .bind(user_id)
        .bind(badges)
        .fetch_all(conn)
        .await
        .map_err(Into::into)
    }
}
