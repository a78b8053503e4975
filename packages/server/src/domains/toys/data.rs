use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::common::{ToyId, UserId};
use crate::domains::toys::models::{Toy, ToySearchResult};
use crate::domains::users::data::UserSummary;

/// Toy listing as returned by the API
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToyData {
    pub id: ToyId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub age_range: String,
    pub condition: String,
    pub category: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_available: bool,
    /// Kilometres from the search origin, one decimal. Absent without an
    /// origin; `null` for toys that have no coordinates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Toy> for ToyData {
    fn from(toy: Toy) -> Self {
        Self {
            id: toy.id,
            user_id: toy.user_id,
            title: toy.title,
            description: toy.description,
            age_range: toy.age_range,
            condition: toy.condition,
            category: toy.category,
            tags: toy.tags,
            images: toy.images,
            location: toy.location,
            latitude: toy.latitude,
            longitude: toy.longitude,
            is_available: toy.is_available,
            distance_km: None,
            owner: None,
            created_at: toy.created_at,
            updated_at: toy.updated_at,
        }
    }
}

impl ToyData {
    pub fn with_owner(mut self, owners: &HashMap<UserId, UserSummary>) -> Self {
        self.owner = owners.get(&self.user_id).cloned();
        self
    }

    pub fn at_distance(mut self, distance_km: Option<f64>) -> Self {
        self.distance_km = Some(distance_km.map(round_km));
        self
    }
}

fn round_km(km: f64) -> f64 {
    (km * 10.0).round() / 10.0
}

/// One page of browse results
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToyPage {
    pub toys: Vec<ToyData>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl ToyPage {
    /// `with_distance` is set when the search had an origin
    pub fn new(
        result: ToySearchResult,
        owners: &HashMap<UserId, UserSummary>,
        with_distance: bool,
        limit: i64,
        offset: i64,
    ) -> Self {
        Self {
            toys: result
                .toys
                .into_iter()
                .map(|row| {
                    let toy = ToyData::from(row.toy).with_owner(owners);
                    if with_distance {
                        toy.at_distance(row.distance_km)
                    } else {
                        toy
                    }
                })
                .collect(),
            total: result.total,
            limit,
            offset,
        }
    }
}

/// Body of `POST /api/toys`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateToyInput {
    pub title: String,
    pub description: String,
    pub age_range: String,
    pub condition: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Body of `PATCH /api/toys/:id`; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateToyInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub age_range: Option<String>,
    pub condition: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_available: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_rounded_to_one_decimal() {
        assert_eq!(round_km(14.5449), 14.5);
        assert_eq!(round_km(0.04), 0.0);
        assert_eq!(round_km(220.36), 220.4);
    }

    fn sample_toy(latitude: Option<f64>) -> Toy {
        let now = Utc::now();
        Toy {
            id: ToyId::new(),
            user_id: UserId::new(),
            title: "Kite".to_string(),
            description: "Red".to_string(),
            age_range: "6-8".to_string(),
            condition: "good".to_string(),
            category: "outdoor".to_string(),
            tags: Vec::new(),
            images: Vec::new(),
            location: None,
            latitude,
            longitude: latitude.map(|_| -93.27),
            is_available: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_distance_key_follows_the_search_origin() {
        let json = serde_json::to_value(ToyData::from(sample_toy(Some(44.98)))).unwrap();
        assert!(json.get("distanceKm").is_none());

        let json =
            serde_json::to_value(ToyData::from(sample_toy(None)).at_distance(None)).unwrap();
        assert!(json["distanceKm"].is_null());
        assert!(json.get("distanceKm").is_some());

        let located = ToyData::from(sample_toy(Some(44.95))).at_distance(Some(14.5449));
        let json = serde_json::to_value(located).unwrap();
        assert_eq!(json["distanceKm"], 14.5);
    }

    #[test]
    fn test_create_input_accepts_camel_case_and_defaults() {
        let input: CreateToyInput = serde_json::from_value(serde_json::json!({
            "title": "Wooden train",
            "description": "Complete set",
            "ageRange": "3-5",
            "condition": "good",
            "category": "Vehicles"
        }))
        .unwrap();

        assert_eq!(input.age_range, "3-5");
        assert!(input.tags.is_empty());
        assert!(input.latitude.is_none());
    }
}
