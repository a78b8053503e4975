use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::common::UserId;
use crate::domains::sustainability::models::{CommunityMetrics, UserBadge};
use crate::domains::sustainability::scoring::{Badge, SustainabilitySnapshot};
use crate::domains::users::models::user::User;

/// Estimated CO₂ avoided per completed exchange (kg)
pub const CO2_KG_PER_EXCHANGE: f64 = 2.5;
/// Estimated landfill waste avoided per completed exchange (kg)
pub const WASTE_KG_PER_EXCHANGE: f64 = 0.8;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeData {
    pub badge: Badge,
    pub label: String,
    pub threshold: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub awarded_at: Option<DateTime<Utc>>,
}

impl From<Badge> for BadgeData {
    fn from(badge: Badge) -> Self {
        Self {
            badge,
            label: badge.label().to_string(),
            threshold: badge.threshold(),
            awarded_at: None,
        }
    }
}

/// A user's sustainability standing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SustainabilityData {
    pub user_id: UserId,
    #[serde(flatten)]
    pub snapshot: SustainabilitySnapshot,
    pub badge_label: String,
    pub earned_badges: Vec<BadgeData>,
}

impl SustainabilityData {
    pub fn new(user: &User, earned: Vec<UserBadge>) -> Self {
        let snapshot =
            SustainabilitySnapshot::from_counters(user.toys_shared, user.successful_exchanges);

        // Unknown badge names (renamed tiers) are skipped rather than failing the read
        let mut earned_badges: Vec<BadgeData> = earned
            .into_iter()
            .filter_map(|row| {
                let badge: Badge = row.badge.parse().ok()?;
                Some(BadgeData {
                    awarded_at: Some(row.awarded_at),
                    ..BadgeData::from(badge)
                })
            })
            .collect();
        earned_badges.sort_by_key(|b| b.badge);

        Self {
            user_id: user.id,
            badge_label: snapshot.badge.label().to_string(),
            snapshot,
            earned_badges,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: UserId,
    pub username: String,
    pub name: String,
    pub profile_picture: Option<String>,
    pub sustainability_score: i32,
    pub current_badge: String,
    pub toys_shared: i32,
    pub successful_exchanges: i32,
}

impl LeaderboardEntry {
    pub fn ranked(users: Vec<User>) -> Vec<Self> {
        users
            .into_iter()
            .enumerate()
            .map(|(idx, user)| Self {
                rank: idx + 1,
                user_id: user.id,
                username: user.username,
                name: user.name,
                profile_picture: user.profile_picture,
                sustainability_score: user.sustainability_score,
                current_badge: user.current_badge,
                toys_shared: user.toys_shared,
                successful_exchanges: user.successful_exchanges,
            })
            .collect()
    }
}

/// Community-wide totals
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityStats {
    pub total_toys_shared: i64,
    pub total_exchanges: i64,
    pub total_members: i64,
    pub toys_available: i64,
    pub co2_saved_kg: f64,
    pub waste_diverted_kg: f64,
    pub updated_at: DateTime<Utc>,
}

impl CommunityStats {
    pub fn new(metrics: CommunityMetrics, total_members: i64, toys_available: i64) -> Self {
        let exchanges = metrics.total_exchanges as f64;
        Self {
            total_toys_shared: metrics.total_toys_shared,
            total_exchanges: metrics.total_exchanges,
            total_members,
            toys_available,
            co2_saved_kg: round_tenth(exchanges * CO2_KG_PER_EXCHANGE),
            waste_diverted_kg: round_tenth(exchanges * WASTE_KG_PER_EXCHANGE),
            updated_at: metrics.updated_at,
        }
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
