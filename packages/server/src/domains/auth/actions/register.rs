//! Register action

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::common::utils::geo::normalize_coordinates;
use crate::common::utils::geocoding::{resolve_coordinates, Geocoder};
use crate::common::ApiError;
use crate::config::Config;
use crate::domains::auth::actions::validation::{
    validate_email, validate_password, validate_username,
};
use crate::domains::auth::data::RegisterInput;
use crate::domains::auth::password::hash_password;
use crate::domains::users::models::{NewUser, User};

/// Create an account.
///
/// Emails listed in `ADMIN_EMAILS` get admin rights at creation.
pub async fn register(
    input: RegisterInput,
    config: &Config,
    geocoder: Option<&Geocoder>,
    pool: &PgPool,
) -> Result<User> {
    let username = input.username.trim().to_string();
    let email = input.email.trim().to_lowercase();
    let name = input.name.trim().to_string();

    validate_username(&username)?;
    validate_email(&email)?;
    validate_password(&input.password)?;
    if name.is_empty() {
        return Err(ApiError::validation("name is required").into());
    }

    let location = input
        .location
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty());
    let coordinates = normalize_coordinates(input.latitude, input.longitude)?;
    let coordinates = resolve_coordinates(geocoder, location.as_deref(), coordinates).await;

    if User::exists_with(&username, &email, pool).await? {
        return Err(ApiError::conflict("Username or email is already registered").into());
    }

    let is_admin = config.is_admin_email(&email);
    let password_hash = hash_password(&input.password)?;

    // A concurrent registration can still hit the unique indexes; that
    // surfaces as a 409 through the sqlx error mapping.
    let user = User::insert(
        NewUser {
            username,
            email,
            password_hash,
            name,
            location,
            latitude: coordinates.map(|c| c.0),
            longitude: coordinates.map(|c| c.1),
            is_admin,
        },
        pool,
    )
    .await?;

    info!(user_id = %user.id, username = %user.username, is_admin, "User registered");
    Ok(user)
}
