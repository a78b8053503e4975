//! Login action

use anyhow::Result;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::common::ApiError;
use crate::domains::auth::password::verify_password;
use crate::domains::users::models::User;

/// Check credentials. Unknown users and wrong passwords fail the same way.
pub async fn login(login: &str, password: &str, pool: &PgPool) -> Result<User> {
    let login = login.trim();
    if login.is_empty() || password.is_empty() {
        return Err(ApiError::InvalidCredentials.into());
    }

    let user = match User::find_by_login(login, pool).await? {
        Some(user) if verify_password(password, &user.password_hash) => user,
        _ => {
            warn!(login = %login, "Failed login attempt");
            return Err(ApiError::InvalidCredentials.into());
        }
    };

    info!(user_id = %user.id, "User logged in");
    Ok(user)
}
