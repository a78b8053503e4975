use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::common::{ToyId, ToyRequestId, UserId};
use crate::domains::exchanges::models::ToyRequest;
use crate::domains::users::data::UserSummary;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToyRequestData {
    pub id: ToyRequestId,
    /// Null once the toy has been deleted
    pub toy_id: Option<ToyId>,
    pub toy_title: String,
    pub requester_id: UserId,
    pub owner_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester: Option<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserSummary>,
    pub message: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ToyRequest> for ToyRequestData {
    fn from(request: ToyRequest) -> Self {
        Self {
            id: request.id,
            toy_id: request.toy_id,
            toy_title: request.toy_title,
            requester_id: request.requester_id,
            owner_id: request.owner_id,
            requester: None,
            owner: None,
            message: request.message,
            status: request.status,
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

impl ToyRequestData {
    pub fn with_parties(mut self, users: &HashMap<UserId, UserSummary>) -> Self {
        self.requester = users.get(&self.requester_id).cloned();
        self.owner = users.get(&self.owner_id).cloned();
        self
    }
}

/// Body of `POST /api/toys/:id/requests`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestInput {
    pub message: Option<String>,
}

/// Body of `PATCH /api/requests/:id`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequestInput {
    pub status: String,
}

/// Query of `GET /api/requests`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListRequestsQuery {
    pub role: Option<String>,
    pub status: Option<String>,
}
