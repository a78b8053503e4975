use crate::common::{Actor, ApiError, UserId};
use crate::domains::auth::JwtService;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::debug;

/// Name of the session cookie set on login
pub const SESSION_COOKIE: &str = "toyshare_session";

/// Authenticated user information from the session token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: UserId,
    pub username: String,
    pub is_admin: bool,
}

impl AuthUser {
    /// Authorization entry point for this user
    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id, self.is_admin)
    }
}

/// JWT authentication middleware
///
/// Reads the token from the session cookie or the Authorization header,
/// verifies it, and adds AuthUser to request extensions. If no token or an
/// invalid token, the request continues without AuthUser (public access).
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let auth_user = extract_auth_user(request.headers(), &jwt_service);

    if let Some(user) = auth_user {
        debug!(
            "Authenticated user: {} (admin: {})",
            user.user_id, user.is_admin
        );
        request.extensions_mut().insert(user);
    } else {
        debug!("No valid authentication token");
    }

    next.run(request).await
}

/// Extract and verify the session token. The Authorization header wins
/// over the cookie when both are present.
fn extract_auth_user(headers: &HeaderMap, jwt_service: &JwtService) -> Option<AuthUser> {
    let token = bearer_token(headers).or_else(|| {
        CookieJar::from_headers(headers)
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
    })?;

    let claims = jwt_service.verify_token(&token).ok()?;

    Some(AuthUser {
        user_id: claims.user_id,
        username: claims.username,
        is_admin: claims.is_admin,
    })
}

/// Token from `Authorization: Bearer <token>` (a raw token is accepted too)
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_str = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str).trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Handlers that take `AuthUser` require a session; `Option<AuthUser>`
/// makes it optional.
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(ApiError::AuthenticationRequired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("test_secret", "test_issuer".to_string(), 24)
    }

    fn headers(name: &str, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::HeaderName::from_bytes(name.as_bytes()).unwrap(),
            value.parse().unwrap(),
        );
        headers
    }

    #[test]
    fn test_extract_token_with_bearer() {
        let jwt_service = service();
        let user_id = UserId::new();
        let token = jwt_service
            .create_token(user_id, "toy_fan".to_string(), true)
            .unwrap();

        let auth_user =
            extract_auth_user(&headers("authorization", &format!("Bearer {}", token)), &jwt_service)
                .unwrap();
        assert_eq!(auth_user.user_id, user_id);
        assert_eq!(auth_user.username, "toy_fan");
        assert!(auth_user.is_admin);
    }

    #[test]
    fn test_extract_token_without_bearer() {
        let jwt_service = service();
        let user_id = UserId::new();
        let token = jwt_service
            .create_token(user_id, "toy_fan".to_string(), false)
            .unwrap();

        let auth_user = extract_auth_user(&headers("authorization", &token), &jwt_service);
        assert_eq!(auth_user.unwrap().user_id, user_id);
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let jwt_service = service();
        let user_id = UserId::new();
        let token = jwt_service
            .create_token(user_id, "toy_fan".to_string(), false)
            .unwrap();

        let cookie = format!("theme=dark; {}={}", SESSION_COOKIE, token);
        let auth_user = extract_auth_user(&headers("cookie", &cookie), &jwt_service);
        assert_eq!(auth_user.unwrap().user_id, user_id);
    }

    #[test]
    fn test_no_auth_header() {
        assert!(extract_auth_user(&HeaderMap::new(), &service()).is_none());
    }

    #[test]
    fn test_invalid_token() {
        let jwt_service = service();
        assert!(extract_auth_user(&headers("authorization", "Bearer invalid_token"), &jwt_service).is_none());
        let cookie = format!("{}=garbage", SESSION_COOKIE);
        assert!(extract_auth_user(&headers("cookie", &cookie), &jwt_service).is_none());
    }
}
