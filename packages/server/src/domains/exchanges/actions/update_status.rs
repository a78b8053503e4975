use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::common::{ApiError, ToyRequestId, UserId};
use crate::domains::exchanges::models::{RequestStatus, ToyRequest};
use crate::domains::sustainability::actions::record_exchange_completed;
use crate::domains::toys::models::Toy;

/// Move a request to `to` on behalf of `actor_id`.
///
/// Completing a request takes the toy off the market, rejects the other
/// open requests for it and credits both parties with an exchange.
pub async fn update_request_status(
    actor_id: UserId,
    request_id: ToyRequestId,
    to: RequestStatus,
    pool: &PgPool,
) -> Result<ToyRequest> {
    let mut tx = pool.begin().await?;

    // Lock order is toy, then requests, then users: the same order toy
    // deletion and request creation use.
    let toy_id = ToyRequest::find_optional(request_id, &mut tx)
        .await?
        .ok_or_else(|| ApiError::not_found("Request"))?
        .toy_id;
    if let Some(toy_id) = toy_id {
        // A concurrent delete may have removed it; the request row below
        // then shows the cancellation.
        Toy::lock_by_id(toy_id, &mut tx).await?;
    }

    let request = ToyRequest::lock_by_id(request_id, &mut tx)
        .await?
        .ok_or_else(|| ApiError::not_found("Request"))?;

    let role = request
        .role_of(actor_id)
        .ok_or_else(|| ApiError::forbidden("You are not part of this exchange"))?;
    let from = request.status()?;
    from.transition(to, role)?;

    let updated = ToyRequest::set_status(request_id, to, &mut tx).await?;

    if to == RequestStatus::Completed {
        let mut rejected = 0;
        if let Some(toy_id) = request.toy_id {
            Toy::set_available(toy_id, false, &mut tx).await?;
            rejected = ToyRequest::close_open_for_toy(
                toy_id,
                Some(request_id),
                RequestStatus::Rejected,
                &mut tx,
            )
            .await?;
        }
        let (owner, requester) =
            record_exchange_completed(request.owner_id, request.requester_id, &mut tx).await?;

        info!(
            request_id = %request_id,
            rejected_requests = rejected,
            owner_score = owner.score,
            requester_score = requester.score,
            "Exchange completed"
        );
    }

    tx.commit().await?;

    info!(
        request_id = %request_id,
        actor_id = %actor_id,
        from = %from,
        to = %to,
        "Request status changed"
    );
    Ok(updated)
}
