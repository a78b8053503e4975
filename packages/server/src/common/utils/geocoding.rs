use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

use super::geo::coarsen_coords;

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
const USER_AGENT: &str = "ToyShare/0.1 (community toy exchange)";

/// Nominatim API response for geocoding
#[derive(Debug, Deserialize)]
struct NominatimResponse {
    lat: String,
    lon: String,
    display_name: String,
}

/// Geocoded location with coarse precision
#[derive(Debug, Clone)]
pub struct GeocodedLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
}

/// Turns free-text locations ("Minneapolis, MN") into coordinates via
/// Nominatim (OpenStreetMap)
#[derive(Clone)]
pub struct Geocoder {
    client: reqwest::Client,
    base_url: String,
}

impl Default for Geocoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Geocoder {
    pub fn new() -> Self {
        Self::with_base_url(NOMINATIM_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Geocode a location string
    ///
    /// Returns coarsened coordinates (2 decimal places ≈ 1km precision) for privacy
    #[instrument(skip(self))]
    pub async fn geocode(&self, query: &str) -> Result<GeocodedLocation> {
        let query = query.trim();
        if query.is_empty() {
            return Err(anyhow!("Cannot geocode an empty location"));
        }

        let url = format!(
            "{}?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(query)
        );

        debug!("Geocoding location: {}", query);

        let response: Vec<NominatimResponse> = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, query = %query, "Geocoding API request failed");
                anyhow!("Geocoding API request failed: {}", e)
            })?
            .json()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to parse geocoding response");
                anyhow!("Failed to parse geocoding response: {}", e)
            })?;

        let result = response.first().ok_or_else(|| {
            warn!(query = %query, "Location not found by geocoding API");
            anyhow!("Location not found: {}", query)
        })?;

        let lat: f64 = result
            .lat
            .parse()
            .map_err(|e| anyhow!("Invalid latitude in response: {}", e))?;
        let lng: f64 = result
            .lon
            .parse()
            .map_err(|e| anyhow!("Invalid longitude in response: {}", e))?;

        let (coarse_lat, coarse_lng) = coarsen_coords(lat, lng);

        debug!(
            "Geocoded {} → ({}, {}) [coarsened from ({}, {})]",
            query, coarse_lat, coarse_lng, lat, lng
        );

        Ok(GeocodedLocation {
            latitude: coarse_lat,
            longitude: coarse_lng,
            display_name: result.display_name.clone(),
        })
    }
}

/// Fill in missing coordinates from a location string.
///
/// Explicit coordinates always win. Geocoding failures are logged and leave
/// the coordinates empty; a listing is never rejected because of them.
pub async fn resolve_coordinates(
    geocoder: Option<&Geocoder>,
    location: Option<&str>,
    coords: Option<(f64, f64)>,
) -> Option<(f64, f64)> {
    if coords.is_some() {
        return coords;
    }
    let (geocoder, location) = match (geocoder, location) {
        (Some(g), Some(l)) if !l.trim().is_empty() => (g, l),
        _ => return None,
    };

    match geocoder.geocode(location).await {
        Ok(found) => Some((found.latitude, found.longitude)),
        Err(e) => {
            warn!(error = %e, location = %location, "Geocoding failed, storing without coordinates");
            None
        }
    }
}
