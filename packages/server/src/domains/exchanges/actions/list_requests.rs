use anyhow::Result;
use sqlx::PgPool;

use crate::common::{ApiError, UserId};
use crate::domains::exchanges::data::ListRequestsQuery;
use crate::domains::exchanges::models::{RequestStatus, ToyRequest};

/// Which requests to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestRole {
    /// Requests on the caller's toys
    Incoming,
    /// Requests the caller made
    Outgoing,
    /// Both
    All,
}

/// Parse `role` and `status` query values
pub fn parse_list_query(
    query: &ListRequestsQuery,
) -> Result<(RequestRole, Option<RequestStatus>), ApiError> {
    let role = match query.role.as_deref().map(str::trim) {
        None | Some("") | Some("all") => RequestRole::All,
        Some("incoming") => RequestRole::Incoming,
        Some("outgoing") => RequestRole::Outgoing,
        Some(other) => {
            return Err(ApiError::validation(format!(
                "role must be incoming or outgoing, got '{}'",
                other
            )))
        }
    };
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<RequestStatus>()
                .map_err(|e| ApiError::validation(e.to_string()))?,
        ),
    };
    Ok((role, status))
}

/// Requests involving the user, newest first
pub async fn list_requests(
    user_id: UserId,
    role: RequestRole,
    status: Option<RequestStatus>,
    pool: &PgPool,
) -> Result<Vec<ToyRequest>> {
    let mut requests = match role {
        RequestRole::Incoming => ToyRequest::find_incoming(user_id, status, pool).await?,
        RequestRole::Outgoing => ToyRequest::find_outgoing(user_id, status, pool).await?,
        RequestRole::All => {
            let mut all = ToyRequest::find_incoming(user_id, status, pool).await?;
            all.extend(ToyRequest::find_outgoing(user_id, status, pool).await?);
            all
        }
    };
    requests.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(role: Option<&str>, status: Option<&str>) -> ListRequestsQuery {
        ListRequestsQuery {
            role: role.map(str::to_string),
            status: status.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_list_query() {
        assert_eq!(
            parse_list_query(&query(None, None)).unwrap(),
            (RequestRole::All, None)
        );
        assert_eq!(
            parse_list_query(&query(Some("incoming"), Some("pending"))).unwrap(),
            (RequestRole::Incoming, Some(RequestStatus::Pending))
        );
        assert_eq!(
            parse_list_query(&query(Some("outgoing"), None)).unwrap().0,
            RequestRole::Outgoing
        );
        assert!(parse_list_query(&query(Some("sideways"), None)).is_err());
        assert!(parse_list_query(&query(None, Some("done"))).is_err());
    }
}
