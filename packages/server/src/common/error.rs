//! HTTP-facing error type.
//!
//! Models and actions return `anyhow::Result`. Actions raise classified
//! failures by returning an `ApiError` wrapped in `anyhow`; the `From`
//! conversion below recovers the classification at the handler boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use super::auth::AuthError;

/// Postgres SQLSTATEs
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        ApiError::NotFound(what.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::AuthenticationRequired | ApiError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::AuthenticationRequired => "authentication_required",
            ApiError::InvalidCredentials => "invalid_credentials",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(ref e) = self {
            error!(error = ?e, "Request failed");
        }

        let status = self.status();
        let body = ErrorBody {
            error: self.code(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => ApiError::not_found("Resource"),
            sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                ApiError::conflict("Resource already exists")
            }
            // The referenced row vanished between a lookup and the write
            sqlx::Error::Database(db) if db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) => {
                ApiError::not_found("Referenced resource")
            }
            _ => ApiError::Internal(e.into()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::AdminRequired => ApiError::forbidden("Admin access required"),
            AuthError::PermissionDenied(msg) => ApiError::Forbidden(msg),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        let e = match e.downcast::<ApiError>() {
            Ok(api) => return api,
            Err(e) => e,
        };
        let e = match e.downcast::<AuthError>() {
            Ok(auth) => return auth.into(),
            Err(e) => e,
        };
        match e.downcast::<sqlx::Error>() {
            Ok(db) => db.into(),
            Err(e) => ApiError::Internal(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classified_error_survives_anyhow() {
        let wrapped: anyhow::Error = ApiError::conflict("Toy is no longer available").into();
        let api: ApiError = wrapped.into();
        assert_eq!(api.status(), StatusCode::CONFLICT);
        assert_eq!(api.to_string(), "Toy is no longer available");
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        let wrapped: anyhow::Error = sqlx::Error::RowNotFound.into();
        let api: ApiError = wrapped.into();
        assert_eq!(api.status(), StatusCode::NOT_FOUND);
        assert_eq!(api.code(), "not_found");
    }

    #[test]
    fn test_auth_errors_map_to_403() {
        let api: ApiError = anyhow::Error::from(AuthError::AdminRequired).into();
        assert_eq!(api.status(), StatusCode::FORBIDDEN);
        assert_eq!(api.to_string(), "Admin access required");

        let api: ApiError = AuthError::PermissionDenied("not your toy".into()).into();
        assert_eq!(api.status(), StatusCode::FORBIDDEN);
        assert_eq!(api.to_string(), "not your toy");
    }

    #[derive(Debug)]
    struct PgError(&'static str);

    impl std::fmt::Display for PgError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "SQLSTATE {}", self.0)
        }
    }

    impl std::error::Error for PgError {}

    impl sqlx::error::DatabaseError for PgError {
        fn message(&self) -> &str {
            "constraint violated"
        }

        fn code(&self) -> Option<std::borrow::Cow<'_, str>> {
            Some(self.0.into())
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::Other
        }
    }

    fn db_error(code: &'static str) -> ApiError {
        let wrapped: anyhow::Error = sqlx::Error::Database(Box::new(PgError(code))).into();
        wrapped.into()
    }

    #[test]
    fn test_constraint_violations_are_classified() {
        assert_eq!(db_error("23505").status(), StatusCode::CONFLICT);

        let api = db_error("23503");
        assert_eq!(api.status(), StatusCode::NOT_FOUND);
        assert_eq!(api.to_string(), "Referenced resource not found");

        assert_eq!(
            db_error("23514").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unclassified_error_is_internal_and_opaque() {
        let api: ApiError = anyhow::anyhow!("connection reset by peer").into();
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.to_string(), "Internal server error");
    }
}
