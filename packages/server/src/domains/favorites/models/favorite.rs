use anyhow::Result;
use sqlx::PgPool;

use crate::common::{ToyId, UserId};
use crate::domains::toys::models::Toy;

/// A member's saved toy
pub struct Favorite;

impl Favorite {
    /// Save a toy. Saving it twice is a no-op.
    pub async fn add(user_id: UserId, toy_id: ToyId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO favorites (user_id, toy_id) VALUES ($1, $2)
             ON CONFLICT (user_id, toy_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(toy_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns false when the toy was not saved
    pub async fn remove(user_id: UserId, toy_id: ToyId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND toy_id = $2")
            .bind(user_id)
            .bind(toy_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Saved toys, most recently saved first
    pub async fn find_toys(user_id: UserId, pool: &PgPool) -> Result<Vec<Toy>> {
        sqlx::query_as::<_, Toy>(
            "SELECT t.* FROM favorites f
             JOIN toys t ON t.id = f.toy_id
             WHERE f.user_id = $1
             ORDER BY f.created_at DESC, t.id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
