use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use crate::common::{ApiError, ToyId, ToyRequestId, UserId};

/// An exchange request from one member for another member's toy
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ToyRequest {
    pub id: ToyRequestId,
    /// `None` once the toy has been deleted
    pub toy_id: Option<ToyId>,
    pub toy_title: String,
    pub requester_id: UserId,
    pub owner_id: UserId,
    pub message: Option<String>,
    pub status: String, // 'pending', 'approved', 'rejected', 'cancelled', 'completed'
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
    Completed,
}

/// Which side of an exchange the caller is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyRole {
    Owner,
    Requester,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Cancelled => "cancelled",
            RequestStatus::Completed => "completed",
        }
    }

    /// Pending and approved requests block a new request for the same toy
    pub fn is_open(&self) -> bool {
        matches!(self, RequestStatus::Pending | RequestStatus::Approved)
    }

    /// Roles allowed to move a request from `self` to `to`. Empty when the
    /// transition does not exist.
    fn allowed_roles(self, to: RequestStatus) -> &'static [PartyRole] {
        use PartyRole::*;
        use RequestStatus::*;

        match (self, to) {
            (Pending, Approved) | (Pending, Rejected) => &[Owner],
            (Pending, Cancelled) => &[Requester],
            (Approved, Completed) | (Approved, Cancelled) => &[Owner, Requester],
            _ => &[],
        }
    }

    /// Validate a status change requested by `role`.
    ///
    /// Unknown transitions are conflicts; a known transition made by the
    /// wrong party is forbidden.
    pub fn transition(self, to: RequestStatus, role: PartyRole) -> Result<RequestStatus, ApiError> {
        let roles = self.allowed_roles(to);
        if roles.is_empty() {
            return Err(ApiError::conflict(format!(
                "Cannot change request from {} to {}",
                self, to
            )));
        }
        if !roles.contains(&role) {
            let who = match role {
                PartyRole::Owner => "the requester",
                PartyRole::Requester => "the toy owner",
            };
            return Err(ApiError::forbidden(format!(
                "Only {} can mark this request {}",
                who, to
            )));
        }
        Ok(to)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            "rejected" => Ok(RequestStatus::Rejected),
            "cancelled" => Ok(RequestStatus::Cancelled),
            "completed" => Ok(RequestStatus::Completed),
            other => Err(anyhow::anyhow!("Invalid request status: {}", other)),
        }
    }
}

/// Fields for a new request
#[derive(Debug, Clone)]
pub struct NewToyRequest {
    pub toy_id: ToyId,
    pub toy_title: String,
    pub requester_id: UserId,
    pub owner_id: UserId,
    pub message: Option<String>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl ToyRequest {
    pub fn status(&self) -> Result<RequestStatus> {
        self.status.parse()
    }

    /// The caller's side of this exchange, if they are a party to it
    pub fn role_of(&self, user_id: UserId) -> Option<PartyRole> {
        if user_id == self.owner_id {
            Some(PartyRole::Owner)
        } else if user_id == self.requester_id {
            Some(PartyRole::Requester)
        } else {
            None
        }
    }

    pub async fn find_by_id(id: ToyRequestId, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>("SELECT * FROM toy_requests WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// Unlocked read, used to find which toy to lock first
    pub async fn find_optional(id: ToyRequestId, conn: &mut PgConnection) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM toy_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(Into::into)
    }

    /// Load a request and hold its row lock until the transaction ends
    pub async fn lock_by_id(id: ToyRequestId, conn: &mut PgConnection) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM toy_requests WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(Into::into)
    }

    /// Whether the requester already has a pending or approved request for the toy
    pub async fn has_open_request(
        toy_id: ToyId,
        requester_id: UserId,
        conn: &mut PgConnection,
    ) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM toy_requests
                WHERE toy_id = $1 AND requester_id = $2
                  AND status IN ('pending', 'approved')
             )",
        )
        .bind(toy_id)
        .bind(requester_id)
        .fetch_one(conn)
        .await?;
        Ok(exists)
    }

    pub async fn insert(new_request: NewToyRequest, conn: &mut PgConnection) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO toy_requests (id, toy_id, toy_title, requester_id, owner_id, message)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(ToyRequestId::new())
        .bind(new_request.toy_id)
        .bind(new_request.toy_title)
        .bind(new_request.requester_id)
        .bind(new_request.owner_id)
        .bind(new_request.message)
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    pub async fn set_status(
        id: ToyRequestId,
        status: RequestStatus,
        conn: &mut PgConnection,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE toy_requests
             SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    /// Move every other open request for a toy to `status`. Returns how many changed.
    pub async fn close_open_for_toy(
        toy_id: ToyId,
        except: Option<ToyRequestId>,
        status: RequestStatus,
        conn: &mut PgConnection,
    ) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE toy_requests
             SET status = $3, updated_at = NOW()
             WHERE toy_id = $1
               AND ($2::uuid IS NULL OR id <> $2)
               AND status IN ('pending', 'approved')",
        )
        .bind(toy_id)
        .bind(except)
        .bind(status.as_str())
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Requests on the user's toys, newest first
    pub async fn find_incoming(
        owner_id: UserId,
        status: Option<RequestStatus>,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM toy_requests
             WHERE owner_id = $1 AND ($2::text IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC",
        )
        .bind(owner_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Requests the user has made, newest first
    pub async fn find_outgoing(
        requester_id: UserId,
        status: Option<RequestStatus>,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM toy_requests
             WHERE requester_id = $1 AND ($2::text IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC",
        )
        .bind(requester_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PartyRole::*;
    use RequestStatus::*;

    #[test]
    fn test_owner_decides_pending_requests() {
        assert_eq!(Pending.transition(Approved, Owner).unwrap(), Approved);
        assert_eq!(Pending.transition(Rejected, Owner).unwrap(), Rejected);
        assert!(matches!(
            Pending.transition(Approved, Requester),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn test_requester_can_withdraw_pending_request() {
        assert_eq!(Pending.transition(Cancelled, Requester).unwrap(), Cancelled);
        assert!(matches!(
            Pending.transition(Cancelled, Owner),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn test_either_party_can_finish_approved_request() {
        for role in [Owner, Requester] {
            assert_eq!(Approved.transition(Completed, role).unwrap(), Completed);
            assert_eq!(Approved.transition(Cancelled, role).unwrap(), Cancelled);
        }
    }

    #[test]
    fn test_unknown_transitions_conflict() {
        let invalid = [
            (Pending, Completed),
            (Pending, Pending),
            (Approved, Rejected),
            (Approved, Pending),
            (Rejected, Approved),
            (Cancelled, Pending),
            (Completed, Cancelled),
        ];
        for (from, to) in invalid {
            for role in [Owner, Requester] {
                assert!(
                    matches!(from.transition(to, role), Err(ApiError::Conflict(_))),
                    "{} -> {} should conflict",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_open_statuses() {
        assert!(Pending.is_open());
        assert!(Approved.is_open());
        assert!(!Completed.is_open());
        assert!(!Rejected.is_open());
        assert!(!Cancelled.is_open());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("completed".parse::<RequestStatus>().unwrap(), Completed);
        assert!("done".parse::<RequestStatus>().is_err());
        assert_eq!(serde_json::to_value(Approved).unwrap(), "approved");
    }
}
