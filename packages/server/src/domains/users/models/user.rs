use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::common::{Page, UserId};

/// User model - SQL persistence layer
///
/// Coordinates are stored coarsened (≈1km) and never exposed on public profiles.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,

    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    pub profile_picture: Option<String>,
    pub is_admin: bool,

    // Sustainability counters and their derived values
    pub toys_shared: i32,
    pub successful_exchanges: i32,
    pub sustainability_score: i32,
    pub current_badge: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a new account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_admin: bool,
}

/// Partial profile update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub location: Option<String>,
    pub coordinates: Option<(f64, f64)>,
    pub profile_picture: Option<String>,
}

/// Counter values after an adjustment
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct UserCounters {
    pub toys_shared: i32,
    pub successful_exchanges: i32,
    pub current_badge: String,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl User {
    /// Find user by ID
    pub async fn find_by_id(id: UserId, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_optional(id: UserId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Batch lookup; missing ids are skipped
    pub async fn find_by_ids(ids: &[UserId], pool: &PgPool) -> Result<Vec<Self>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Find user by username (case-insensitive) or email
    pub async fn find_by_login(login: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM users
             WHERE lower(username) = lower($1) OR email = lower($1)
             LIMIT 1",
        )
        .bind(login.trim())
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Whether a username or email is already taken
    pub async fn exists_with(username: &str, email: &str, pool: &PgPool) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM users WHERE lower(username) = lower($1) OR email = lower($2)
             )",
        )
        .bind(username)
        .bind(email)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Insert new user
    pub async fn insert(new_user: NewUser, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO users (
                id,
                username,
                email,
                password_hash,
                name,
                location,
                latitude,
                longitude,
                is_admin
             )
             VALUES ($1, $2, lower($3), $4, $5, $6, $7, $8, $9)
             RETURNING *",
        )
        .bind(UserId::new())
        .bind(new_user.username)
        .bind(new_user.email)
        .bind(new_user.password_hash)
        .bind(new_user.name)
        .bind(new_user.location)
        .bind(new_user.latitude)
        .bind(new_user.longitude)
        .bind(new_user.is_admin)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Apply a partial profile update
    pub async fn update_profile(id: UserId, changes: ProfileChanges, pool: &PgPool) -> Result<Self> {
        let (latitude, longitude) = match changes.coordinates {
            Some((lat, lng)) => (Some(lat), Some(lng)),
            None => (None, None),
        };

        sqlx::query_as::<_, Self>(
            "UPDATE users
             SET name = COALESCE($2, name),
                 location = COALESCE($3, location),
                 latitude = COALESCE($4, latitude),
                 longitude = COALESCE($5, longitude),
                 profile_picture = COALESCE($6, profile_picture),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.location)
        .bind(latitude)
        .bind(longitude)
        .bind(changes.profile_picture)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// All users, newest first (admin listing)
    pub async fn find_all(page: Page, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM users
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2",
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Top users by sustainability score
    pub async fn leaderboard(limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM users
             ORDER BY sustainability_score DESC, successful_exchanges DESC, created_at ASC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    pub async fn all_ids(conn: &mut PgConnection) -> Result<Vec<UserId>> {
        sqlx::query_scalar::<_, UserId>("SELECT id FROM users ORDER BY created_at")
            .fetch_all(conn)
            .await
            .map_err(Into::into)
    }

    // -------------------------------------------------------------------------
    // Sustainability counters (always called inside a transaction)
    // -------------------------------------------------------------------------

    /// Add deltas to the counters, flooring at zero, and return the new values
    pub async fn adjust_counters(
        id: UserId,
        toys_delta: i32,
        exchanges_delta: i32,
        conn: &mut PgConnection,
    ) -> Result<UserCounters> {
        sqlx::query_as::<_, UserCounters>(
            "UPDATE users
             SET toys_shared = GREATEST(0, toys_shared + $2),
                 successful_exchanges = GREATEST(0, successful_exchanges + $3),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING toys_shared, successful_exchanges, current_badge",
        )
        .bind(id)
        .bind(toys_delta)
        .bind(exchanges_delta)
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    /// Current counters, locking the row for the rest of the transaction
    pub async fn lock_counters(id: UserId, conn: &mut PgConnection) -> Result<UserCounters> {
        sqlx::query_as::<_, UserCounters>(
            "SELECT toys_shared, successful_exchanges, current_badge
             FROM users WHERE id = $1
             FOR UPDATE",
        )
        .bind(id)
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    /// Store the derived score and badge
    pub async fn set_sustainability(
        id: UserId,
        score: i32,
        badge: &str,
        conn: &mut PgConnection,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE users
             SET sustainability_score = $2, current_badge = $3
             WHERE id = $1",
        )
        .bind(id)
        .bind(score)
        .bind(badge)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Rebuild every user's counters from listings and completed exchanges
    pub async fn rebuild_counters(conn: &mut PgConnection) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE users u
             SET toys_shared = (SELECT COUNT(*) FROM toys t WHERE t.user_id = u.id),
                 successful_exchanges = (
                     SELECT COUNT(*) FROM toy_requests r
                     WHERE r.status = 'completed'
                       AND (r.owner_id = u.id OR r.requester_id = u.id)
                 ),
                 updated_at = NOW()",
        )
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }
}
