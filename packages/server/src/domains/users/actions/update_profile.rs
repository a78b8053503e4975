use anyhow::Result;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;

use crate::common::utils::geo::normalize_coordinates;
use crate::common::utils::geocoding::{resolve_coordinates, Geocoder};
use crate::common::{ApiError, UserId};
use crate::domains::users::models::{ProfileChanges, User};

/// Body of `PATCH /api/users/me`; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    pub name: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub profile_picture: Option<String>,
}

pub fn validate_profile_changes(input: UpdateProfileInput) -> Result<ProfileChanges, ApiError> {
    let name = match input.name.map(|n| n.trim().to_string()) {
        Some(name) if name.is_empty() => return Err(ApiError::validation("name cannot be empty")),
        other => other,
    };

    Ok(ProfileChanges {
        name,
        location: input
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty()),
        coordinates: normalize_coordinates(input.latitude, input.longitude)?,
        profile_picture: input.profile_picture.map(|p| p.trim().to_string()),
    })
}

/// Update the caller's own profile
pub async fn update_profile(
    user_id: UserId,
    input: UpdateProfileInput,
    geocoder: Option<&Geocoder>,
    pool: &PgPool,
) -> Result<User> {
    let mut changes = validate_profile_changes(input)?;
    if changes.coordinates.is_none() {
        changes.coordinates =
            resolve_coordinates(geocoder, changes.location.as_deref(), None).await;
    }

    let user = User::update_profile(user_id, changes, pool).await?;
    info!(user_id = %user_id, "Profile updated");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_changes_nothing() {
        let changes = validate_profile_changes(UpdateProfileInput::default()).unwrap();
        assert!(changes.name.is_none());
        assert!(changes.location.is_none());
        assert!(changes.coordinates.is_none());
        assert!(changes.profile_picture.is_none());
    }

    #[test]
    fn test_coordinates_are_coarsened() {
        let changes = validate_profile_changes(UpdateProfileInput {
            latitude: Some(44.97776),
            longitude: Some(-93.26501),
            ..UpdateProfileInput::default()
        })
        .unwrap();
        assert_eq!(changes.coordinates, Some((44.98, -93.27)));
    }

    #[test]
    fn test_rejects_blank_name_and_half_coordinates() {
        assert!(validate_profile_changes(UpdateProfileInput {
            name: Some("   ".to_string()),
            ..UpdateProfileInput::default()
        })
        .is_err());

        assert!(validate_profile_changes(UpdateProfileInput {
            latitude: Some(44.9),
            ..UpdateProfileInput::default()
        })
        .is_err());
    }
}
