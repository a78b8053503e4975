use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::common::utils::geocoding::{resolve_coordinates, Geocoder};
use crate::common::{Actor, ApiError, Capability, ToyId};
use crate::domains::toys::actions::validate_changes;
use crate::domains::toys::data::UpdateToyInput;
use crate::domains::toys::models::Toy;

/// Partially update a listing. Only the owner or an admin may do this.
pub async fn update_toy(
    actor: Actor,
    toy_id: ToyId,
    input: UpdateToyInput,
    geocoder: Option<&Geocoder>,
    pool: &PgPool,
) -> Result<Toy> {
    let toy = Toy::find_optional(toy_id, pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Toy"))?;

    let actor_id = actor.id();
    actor
        .can(Capability::ModifyOwned {
            owner_id: toy.user_id,
        })
        .check()?;

    let mut changes = validate_changes(input)?;
    // A new location without coordinates gets geocoded
    if changes.location.is_some() && changes.coordinates.is_none() {
        changes.coordinates = resolve_coordinates(geocoder, changes.location.as_deref(), None).await;
    }

    let updated = Toy::update(toy_id, changes, pool).await?;
    info!(toy_id = %toy_id, actor_id = %actor_id, "Toy updated");
    Ok(updated)
}
