use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use crate::common::{ToyId, UserId};

/// Toy - a listing shared by a member
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Toy {
    pub id: ToyId,
    pub user_id: UserId,

    // Content
    pub title: String,
    pub description: String,
    pub age_range: String, // '0-2', '3-5', '6-8', '9-12', '13+'
    pub condition: String, // 'new', 'like_new', 'good', 'fair', 'well_loved'
    pub category: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,

    // Location (coarse precision)
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    pub is_available: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Enums for type-safe filters
// =============================================================================

/// Age range a toy is suitable for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AgeRange {
    #[serde(rename = "0-2")]
    Toddler,
    #[serde(rename = "3-5")]
    Preschool,
    #[serde(rename = "6-8")]
    EarlySchool,
    #[serde(rename = "9-12")]
    Preteen,
    #[serde(rename = "13+")]
    Teen,
}

impl AgeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeRange::Toddler => "0-2",
            AgeRange::Preschool => "3-5",
            AgeRange::EarlySchool => "6-8",
            AgeRange::Preteen => "9-12",
            AgeRange::Teen => "13+",
        }
    }
}

impl std::fmt::Display for AgeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AgeRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        // A bare "13+" in a query string decodes to "13 "
        match s.trim() {
            "0-2" => Ok(AgeRange::Toddler),
            "3-5" => Ok(AgeRange::Preschool),
            "6-8" => Ok(AgeRange::EarlySchool),
            "9-12" => Ok(AgeRange::Preteen),
            "13+" | "13" | "13plus" => Ok(AgeRange::Teen),
            other => Err(anyhow::anyhow!("Invalid age range: {}", other)),
        }
    }
}

/// Physical condition of a toy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ToyCondition {
    New,
    LikeNew,
    Good,
    Fair,
    WellLoved,
}

impl ToyCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToyCondition::New => "new",
            ToyCondition::LikeNew => "like_new",
            ToyCondition::Good => "good",
            ToyCondition::Fair => "fair",
            ToyCondition::WellLoved => "well_loved",
        }
    }
}

impl std::fmt::Display for ToyCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ToyCondition {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "new" => Ok(ToyCondition::New),
            "like_new" => Ok(ToyCondition::LikeNew),
            "good" => Ok(ToyCondition::Good),
            "fair" => Ok(ToyCondition::Fair),
            "well_loved" => Ok(ToyCondition::WellLoved),
            _ => Err(anyhow::anyhow!("Invalid condition: {}", s.trim())),
        }
    }
}

/// Normalize free-text tags: trimmed, lower-cased, no empties, no duplicates
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

/// Fields for a new listing (already validated)
#[derive(Debug, Clone)]
pub struct NewToy {
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub age_range: AgeRange,
    pub condition: ToyCondition,
    pub category: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub location: Option<String>,
    pub coordinates: Option<(f64, f64)>,
}

/// Partial listing update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct ToyChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub age_range: Option<AgeRange>,
    pub condition: Option<ToyCondition>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub location: Option<String>,
    pub coordinates: Option<(f64, f64)>,
    pub is_available: Option<bool>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Toy {
    /// Find toy by ID
    pub async fn find_by_id(id: ToyId, pool: &PgPool) -> Result<Self> {
        let toy = sqlx::query_as::<_, Toy>("SELECT * FROM toys WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(toy)
    }

    pub async fn find_optional(id: ToyId, pool: &PgPool) -> Result<Option<Self>> {
        let toy = sqlx::query_as::<_, Toy>("SELECT * FROM toys WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(toy)
    }

    /// Load a toy and hold its row lock until the transaction ends
    pub async fn lock_by_id(id: ToyId, conn: &mut PgConnection) -> Result<Option<Self>> {
        let toy = sqlx::query_as::<_, Toy>("SELECT * FROM toys WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(toy)
    }

    /// Every listing of a user, newest first
    pub async fn find_by_user(user_id: UserId, pool: &PgPool) -> Result<Vec<Self>> {
        let toys = sqlx::query_as::<_, Toy>(
            "SELECT * FROM toys
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(toys)
    }

    pub async fn count_available(pool: &PgPool) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM toys WHERE is_available = true")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Create a new listing (returns inserted record with defaults applied)
    pub async fn insert(new_toy: NewToy, conn: &mut PgConnection) -> Result<Self> {
        let (latitude, longitude) = match new_toy.coordinates {
            Some((lat, lng)) => (Some(lat), Some(lng)),
            None => (None, None),
        };

        let toy = sqlx::query_as::<_, Toy>(
            r#"
            INSERT INTO toys (
                id,
                user_id,
                title,
                description,
                age_range,
                condition,
                category,
                tags,
                images,
                location,
                latitude,
                longitude
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(ToyId::new())
        .bind(new_toy.user_id)
        .bind(new_toy.title)
        .bind(new_toy.description)
        .bind(new_toy.age_range.as_str())
        .bind(new_toy.condition.as_str())
        .bind(new_toy.category)
        .bind(new_toy.tags)
        .bind(new_toy.images)
        .bind(new_toy.location)
        .bind(latitude)
        .bind(longitude)
        .fetch_one(conn)
        .await?;

        Ok(toy)
    }

    /// Apply a partial update
    pub async fn update(id: ToyId, changes: ToyChanges, pool: &PgPool) -> Result<Self> {
        let (latitude, longitude) = match changes.coordinates {
            Some((lat, lng)) => (Some(lat), Some(lng)),
            None => (None, None),
        };

        let toy = sqlx::query_as::<_, Toy>(
            r#"
            UPDATE toys
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                age_range = COALESCE($4, age_range),
                condition = COALESCE($5, condition),
                category = COALESCE($6, category),
                tags = COALESCE($7, tags),
                images = COALESCE($8, images),
                location = COALESCE($9, location),
                latitude = COALESCE($10, latitude),
                longitude = COALESCE($11, longitude),
                is_available = COALESCE($12, is_available),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.age_range.map(|a| a.as_str()))
        .bind(changes.condition.map(|c| c.as_str()))
        .bind(changes.category)
        .bind(changes.tags)
        .bind(changes.images)
        .bind(changes.location)
        .bind(latitude)
        .bind(longitude)
        .bind(changes.is_available)
        .fetch_one(pool)
        .await?;

        Ok(toy)
    }

    /// Mark a toy as available or taken
    pub async fn set_available(id: ToyId, available: bool, conn: &mut PgConnection) -> Result<()> {
        sqlx::query("UPDATE toys SET is_available = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(available)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Delete a toy. Returns false if it was already gone.
    pub async fn delete(id: ToyId, conn: &mut PgConnection) -> Result<bool> {
        let result = sqlx::query("DELETE FROM toys WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
