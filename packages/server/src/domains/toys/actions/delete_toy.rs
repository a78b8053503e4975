use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::common::{Actor, ApiError, Capability, ToyId};
use crate::domains::exchanges::models::{RequestStatus, ToyRequest};
use crate::domains::sustainability::actions::record_toy_removed;
use crate::domains::toys::models::Toy;

/// Remove a listing (owner or admin).
///
/// Open requests on the toy are cancelled first; completed ones keep their
/// history with the toy reference cleared. Favorites go with the toy.
pub async fn delete_toy(actor: Actor, toy_id: ToyId, pool: &PgPool) -> Result<()> {
    let mut tx = pool.begin().await?;

    let toy = Toy::lock_by_id(toy_id, &mut tx)
        .await?
        .ok_or_else(|| ApiError::not_found("Toy"))?;

    let actor_id = actor.id();
    actor
        .can(Capability::ModifyOwned {
            owner_id: toy.user_id,
        })
        .check()?;

    let cancelled =
        ToyRequest::close_open_for_toy(toy_id, None, RequestStatus::Cancelled, &mut tx).await?;
    Toy::delete(toy_id, &mut tx).await?;
    let snapshot = record_toy_removed(toy.user_id, &mut tx).await?;

    tx.commit().await?;

    info!(
        toy_id = %toy_id,
        owner_id = %toy.user_id,
        actor_id = %actor_id,
        cancelled_requests = cancelled,
        owner_score = snapshot.score,
        "Toy deleted"
    );
    Ok(())
}
