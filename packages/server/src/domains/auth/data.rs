use serde::{Deserialize, Serialize};

use crate::domains::users::data::CurrentUserData;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// `login` may be a username or an email address
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    #[serde(alias = "username", alias = "email")]
    pub login: String,
    pub password: String,
}

/// Returned by register and login. The token is also set as a cookie.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: CurrentUserData,
}
