use axum::{extract::Extension, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::common::ApiError;
use crate::domains::auth::actions;
use crate::domains::auth::data::{AuthResponse, LoginInput, RegisterInput};
use crate::domains::auth::JwtService;
use crate::domains::users::data::CurrentUserData;
use crate::domains::users::models::User;
use crate::server::app::AppState;
use crate::server::middleware::SESSION_COOKIE;

/// `POST /api/auth/register`
pub async fn register(
    Extension(state): Extension<AppState>,
    jar: CookieJar,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), ApiError> {
    let user = actions::register(input, &state.config, state.geocoder(), &state.db_pool).await?;
    let (jar, response) = start_session(jar, &state.jwt_service, user)?;

    Ok((StatusCode::CREATED, jar, Json(response)))
}

/// `POST /api/auth/login`
pub async fn login(
    Extension(state): Extension<AppState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    let user = actions::login(&input.login, &input.password, &state.db_pool).await?;
    let (jar, response) = start_session(jar, &state.jwt_service, user)?;

    Ok((jar, Json(response)))
}

/// `POST /api/auth/logout` - tokens are stateless, so this only clears the cookie
pub async fn logout(jar: CookieJar) -> (StatusCode, CookieJar) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (StatusCode::NO_CONTENT, jar)
}

fn start_session(
    jar: CookieJar,
    jwt_service: &JwtService,
    user: User,
) -> Result<(CookieJar, AuthResponse), ApiError> {
    let token = jwt_service.create_token(user.id, user.username.clone(), user.is_admin)?;
    let cookie = session_cookie(token.clone(), jwt_service.ttl_seconds());

    Ok((
        jar.add(cookie),
        AuthResponse {
            token,
            user: CurrentUserData::from(user),
        },
    ))
}

fn session_cookie(token: String, max_age_seconds: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(max_age_seconds))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc".to_string(), 3600);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::hours(1)));
    }
}
