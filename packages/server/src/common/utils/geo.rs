//! Great-circle geometry for radius browsing.

use crate::common::error::ApiError;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Slack added to each side of a bounding box (degrees, ≈0.1 m) so rounding
/// never excludes a point lying exactly on the radius.
const BOX_MARGIN_DEG: f64 = 1e-6;

/// Coarsen coordinates to city-level precision for privacy
///
/// Rounds to 2 decimal places ≈ 1km precision (neighbourhood, not exact address)
pub fn coarsen_coords(lat: f64, lng: f64) -> (f64, f64) {
    ((lat * 100.0).round() / 100.0, (lng * 100.0).round() / 100.0)
}

/// Calculate distance between two coordinates in kilometers
///
/// Uses Haversine formula for accuracy on Earth's surface
pub fn calculate_distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lng2 - lng1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlng / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Check that a coordinate pair is on the globe.
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), ApiError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(ApiError::validation("latitude must be between -90 and 90"));
    }
    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        return Err(ApiError::validation(
            "longitude must be between -180 and 180",
        ));
    }
    Ok(())
}

/// Validate an optional coordinate pair from user input.
///
/// Latitude and longitude must be given together. Valid pairs come back
/// coarsened.
pub fn normalize_coordinates(
    lat: Option<f64>,
    lng: Option<f64>,
) -> Result<Option<(f64, f64)>, ApiError> {
    match (lat, lng) {
        (None, None) => Ok(None),
        (Some(lat), Some(lng)) => {
            validate_coordinates(lat, lng)?;
            Ok(Some(coarsen_coords(lat, lng)))
        }
        _ => Err(ApiError::validation(
            "latitude and longitude must be provided together",
        )),
    }
}

/// Lat/lng rectangle that contains every point within a radius.
///
/// Only a pre-filter: points inside the box can still be outside the radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    /// `None` when the box spans every longitude (poles, antimeridian)
    pub lng_range: Option<(f64, f64)>,
}

impl BoundingBox {
    pub fn around(lat: f64, lng: f64, radius_km: f64) -> Self {
        let angular = radius_km / EARTH_RADIUS_KM;
        let dlat = angular.to_degrees() + BOX_MARGIN_DEG;

        let min_lat = (lat - dlat).max(-90.0);
        let max_lat = (lat + dlat).min(90.0);

        if min_lat <= -90.0 || max_lat >= 90.0 {
            return Self {
                min_lat,
                max_lat,
                lng_range: None,
            };
        }

        let ratio = angular.sin() / lat.to_radians().cos();
        if !(ratio.is_finite() && ratio < 1.0) {
            return Self {
                min_lat,
                max_lat,
                lng_range: None,
            };
        }

        let dlng = ratio.asin().to_degrees() + BOX_MARGIN_DEG;
        let (min_lng, max_lng) = (lng - dlng, lng + dlng);

        let lng_range = if min_lng < -180.0 || max_lng > 180.0 {
            None
        } else {
            Some((min_lng, max_lng))
        };

        Self {
            min_lat,
            max_lat,
            lng_range,
        }
    }

    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        let lat_ok = lat >= self.min_lat && lat <= self.max_lat;
        let lng_ok = match self.lng_range {
            Some((min, max)) => lng >= min && lng <= max,
            None => true,
        };
        lat_ok && lng_ok
    }
}
