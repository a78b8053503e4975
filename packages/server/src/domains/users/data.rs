use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use anyhow::Result;
use sqlx::PgPool;

use crate::common::UserId;
use crate::domains::users::models::User;

/// Public profile. Email and coordinates are never included.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUserData {
    pub id: UserId,
    pub username: String,
    pub name: String,
    pub location: Option<String>,
    pub profile_picture: Option<String>,
    pub toys_shared: i32,
    pub successful_exchanges: i32,
    pub sustainability_score: i32,
    pub current_badge: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUserData {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            location: user.location,
            profile_picture: user.profile_picture,
            toys_shared: user.toys_shared,
            successful_exchanges: user.successful_exchanges,
            sustainability_score: user.sustainability_score,
            current_badge: user.current_badge,
            created_at: user.created_at,
        }
    }
}

/// The caller's own profile
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserData {
    #[serde(flatten)]
    pub profile: PublicUserData,
    pub email: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_admin: bool,
}

impl From<User> for CurrentUserData {
    fn from(user: User) -> Self {
        let email = user.email.clone();
        let (latitude, longitude, is_admin) = (user.latitude, user.longitude, user.is_admin);
        Self {
            profile: PublicUserData::from(user),
            email,
            latitude,
            longitude,
            is_admin,
        }
    }
}

/// Admin listing row
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserData {
    #[serde(flatten)]
    pub profile: PublicUserData,
    pub email: String,
    pub is_admin: bool,
}

impl From<User> for AdminUserData {
    fn from(user: User) -> Self {
        let email = user.email.clone();
        let is_admin = user.is_admin;
        Self {
            profile: PublicUserData::from(user),
            email,
            is_admin,
        }
    }
}

/// Compact user reference embedded in toys, messages and requests
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    pub name: String,
    pub profile_picture: Option<String>,
    pub current_badge: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
            profile_picture: user.profile_picture.clone(),
            current_badge: user.current_badge.clone(),
        }
    }
}

impl UserSummary {
    /// Load summaries for a set of users, keyed by id
    pub async fn load_many(
        ids: impl IntoIterator<Item = UserId>,
        pool: &PgPool,
    ) -> Result<HashMap<UserId, UserSummary>> {
        let mut ids: Vec<UserId> = ids.into_iter().collect();
        ids.sort();
        ids.dedup();

        let users = User::find_by_ids(&ids, pool).await?;
        Ok(users
            .iter()
            .map(|user| (user.id, UserSummary::from(user)))
            .collect())
    }
}
