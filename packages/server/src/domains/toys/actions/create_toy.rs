use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::common::utils::geocoding::{resolve_coordinates, Geocoder};
use crate::common::UserId;
use crate::domains::sustainability::actions::record_toy_shared;
use crate::domains::toys::actions::validate_new_toy;
use crate::domains::toys::data::CreateToyInput;
use crate::domains::toys::models::Toy;

/// List a new toy for `owner_id`.
///
/// The owner's shared count, score, badge and the community total are
/// updated in the same transaction as the insert.
pub async fn create_toy(
    owner_id: UserId,
    input: CreateToyInput,
    geocoder: Option<&Geocoder>,
    pool: &PgPool,
) -> Result<Toy> {
    let mut new_toy = validate_new_toy(owner_id, input)?;
    new_toy.coordinates =
        resolve_coordinates(geocoder, new_toy.location.as_deref(), new_toy.coordinates).await;

    let mut tx = pool.begin().await?;
    let toy = Toy::insert(new_toy, &mut tx).await?;
    let snapshot = record_toy_shared(owner_id, &mut tx).await?;
    tx.commit().await?;

    info!(
        toy_id = %toy.id,
        owner_id = %owner_id,
        score = snapshot.score,
        "Toy listed"
    );
    Ok(toy)
}
