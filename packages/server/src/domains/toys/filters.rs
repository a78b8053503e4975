//! Browse filters for toy listings.
//!
//! Clients send filters in several shapes: `?condition=good`,
//! `?condition=good&condition=fair`, `?condition[]=good` or
//! `?condition=good,fair`. All of them parse to the same `ToyFilter`.

use crate::common::pagination::{Page, PageParams, DEFAULT_LIMIT, MAX_LIMIT};
use crate::common::utils::geo::validate_coordinates;
use crate::common::{ApiError, UserId};
use crate::domains::toys::models::toy::{AgeRange, ToyCondition};

/// Reference point for distance calculations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToySort {
    #[default]
    Newest,
    Distance,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToyFilter {
    pub age_ranges: Vec<AgeRange>,
    pub conditions: Vec<ToyCondition>,
    /// Lower-cased
    pub categories: Vec<String>,
    /// Lower-cased; matches toys carrying any of them
    pub tags: Vec<String>,
    pub search: Option<String>,
    pub user_id: Option<UserId>,
    pub origin: Option<GeoPoint>,
    pub radius_km: Option<f64>,
    /// `None` shows toys in every availability state
    pub is_available: Option<bool>,
    pub sort: ToySort,
    pub page: Page,
}

impl Default for ToyFilter {
    fn default() -> Self {
        Self {
            age_ranges: Vec::new(),
            conditions: Vec::new(),
            categories: Vec::new(),
            tags: Vec::new(),
            search: None,
            user_id: None,
            origin: None,
            radius_km: None,
            is_available: Some(true),
            sort: ToySort::Newest,
            page: Page::default(),
        }
    }
}

/// Raw values collected per parameter before validation
#[derive(Default)]
struct RawFilter {
    age_ranges: Vec<String>,
    conditions: Vec<String>,
    categories: Vec<String>,
    tags: Vec<String>,
    search: Option<String>,
    user_id: Option<String>,
    latitude: Option<String>,
    longitude: Option<String>,
    distance: Option<String>,
    available: Option<String>,
    sort: Option<String>,
    limit: Option<String>,
    offset: Option<String>,
}

impl ToyFilter {
    /// Parse decoded query pairs. Unknown keys are ignored; for scalar keys
    /// the last occurrence wins.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Result<Self, ApiError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut raw = RawFilter::default();

        for (key, value) in pairs {
            let key = key.as_ref();
            let key = key.strip_suffix("[]").unwrap_or(key);
            let value = value.as_ref();

            match key {
                "ageRange" | "age_range" | "ageRanges" => push_values(&mut raw.age_ranges, value),
                "condition" | "conditions" => push_values(&mut raw.conditions, value),
                "category" | "categories" => push_values(&mut raw.categories, value),
                "tags" | "tag" => push_values(&mut raw.tags, value),
                "search" | "q" => raw.search = Some(value.to_string()),
                "userId" | "user_id" => raw.user_id = Some(value.to_string()),
                "lat" | "latitude" => raw.latitude = Some(value.to_string()),
                "lon" | "lng" | "longitude" => raw.longitude = Some(value.to_string()),
                "distance" | "radius" | "radiusKm" => raw.distance = Some(value.to_string()),
                "available" | "isAvailable" => raw.available = Some(value.to_string()),
                "sort" => raw.sort = Some(value.to_string()),
                "limit" => raw.limit = Some(value.to_string()),
                "offset" => raw.offset = Some(value.to_string()),
                _ => {}
            }
        }

        raw.validate()
    }

    /// Parse a raw (still percent-encoded) query string
    pub fn from_query_string(query: Option<&str>) -> Result<Self, ApiError> {
        let query = query.unwrap_or_default();
        Self::from_query_pairs(url::form_urlencoded::parse(query.as_bytes()))
    }

    /// True when results must be filtered or ordered in memory, so SQL
    /// pagination cannot be used
    pub fn needs_post_processing(&self) -> bool {
        self.radius_km.is_some() || self.sort == ToySort::Distance
    }

    /// ILIKE pattern for the search term
    pub fn search_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(|term| format!("%{}%", escape_like(term)))
    }
}

impl RawFilter {
    fn validate(self) -> Result<ToyFilter, ApiError> {
        let age_ranges = self
            .age_ranges
            .iter()
            .map(|v| v.parse::<AgeRange>())
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(|e| ApiError::validation(e.to_string()))?;
        let conditions = self
            .conditions
            .iter()
            .map(|v| v.parse::<ToyCondition>())
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(|e| ApiError::validation(e.to_string()))?;

        let search = self
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let user_id = match self.user_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                UserId::parse(raw).map_err(|_| ApiError::validation("userId must be a UUID"))?,
            ),
        };

        let latitude = parse_number("lat", self.latitude.as_deref())?;
        let longitude = parse_number("lon", self.longitude.as_deref())?;
        let origin = match (latitude, longitude) {
            (None, None) => None,
            (Some(latitude), Some(longitude)) => {
                validate_coordinates(latitude, longitude)?;
                Some(GeoPoint {
                    latitude,
                    longitude,
                })
            }
            _ => {
                return Err(ApiError::validation(
                    "lat and lon must be provided together",
                ))
            }
        };

        let radius_km = parse_number("distance", self.distance.as_deref())?;
        if let Some(radius) = radius_km {
            if !(radius.is_finite() && radius > 0.0) {
                return Err(ApiError::validation("distance must be a positive number"));
            }
            if origin.is_none() {
                return Err(ApiError::validation(
                    "distance requires lat and lon",
                ));
            }
        }

        let is_available = match self.available.as_deref().map(|v| v.trim().to_lowercase()) {
            None => Some(true),
            Some(v) => match v.as_str() {
                "" | "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                "all" | "any" => None,
                _ => {
                    return Err(ApiError::validation(
                        "available must be true, false or all",
                    ))
                }
            },
        };

        let sort = match self.sort.as_deref().map(str::trim) {
            None | Some("") | Some("newest") => ToySort::Newest,
            Some("distance") => {
                if origin.is_none() {
                    return Err(ApiError::validation("sort=distance requires lat and lon"));
                }
                ToySort::Distance
            }
            Some(other) => {
                return Err(ApiError::validation(format!(
                    "sort must be newest or distance, got '{}'",
                    other
                )))
            }
        };

        let page = PageParams {
            limit: parse_integer("limit", self.limit.as_deref())?,
            offset: parse_integer("offset", self.offset.as_deref())?,
        }
        .validate(DEFAULT_LIMIT, MAX_LIMIT)?;

        Ok(ToyFilter {
            age_ranges: dedupe(age_ranges),
            conditions: dedupe(conditions),
            categories: dedupe(self.categories.iter().map(|c| c.to_lowercase()).collect()),
            tags: dedupe(self.tags.iter().map(|t| t.to_lowercase()).collect()),
            search,
            user_id,
            origin,
            radius_km,
            is_available,
            sort,
            page,
        })
    }
}

/// Split a comma-separated value and keep the non-empty parts
fn push_values(target: &mut Vec<String>, value: &str) {
    target.extend(
        value
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string),
    );
}

/// Remove duplicates, keeping first-seen order
fn dedupe<T: PartialEq>(values: Vec<T>) -> Vec<T> {
    let mut out = Vec::with_capacity(values.len());
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

fn parse_number(name: &str, raw: Option<&str>) -> Result<Option<f64>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ApiError::validation(format!("{} must be a number", name))),
    }
}

fn parse_integer(name: &str, raw: Option<&str>) -> Result<Option<i64>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse::<i64>()
            .map(Some)
            .map_err(|_| ApiError::validation(format!("{} must be an integer", name))),
    }
}

/// Escape LIKE wildcards so user input matches literally
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
