//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::get,
    Router,
};
use sqlx::PgPool;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::common::utils::geocoding::Geocoder;
use crate::config::Config;
use crate::domains::auth::JwtService;
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{api_routes, auth_routes, health_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_service: Arc<JwtService>,
    /// Present only when geocoding is enabled
    pub geocoder: Option<Arc<Geocoder>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db_pool: PgPool, config: Config) -> Self {
        let jwt_service = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_issuer.clone(),
            config.session_ttl_hours,
        ));
        let geocoder = config.geocoding_enabled.then(|| Arc::new(Geocoder::new()));

        Self {
            db_pool,
            jwt_service,
            geocoder,
            config: Arc::new(config),
        }
    }

    pub fn geocoder(&self) -> Option<&Geocoder> {
        self.geocoder.as_deref()
    }
}

/// CORS: any origin when none are configured, otherwise the listed ones
/// with credentials so the session cookie is sent.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        cors.allow_origin(tower_http::cors::Any)
    } else {
        cors.allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true)
    }
}

/// Build the Axum application router
pub fn build_app(pool: PgPool, config: Config) -> Router {
    let rate_limit_enabled = config.rate_limit_enabled;
    let cors = cors_layer(&config.allowed_origins);
    let app_state = AppState::new(pool, config);

    // Clone jwt_service for middleware closure
    let jwt_service_for_middleware = app_state.jwt_service.clone();

    // Register/login are rate limited per client IP: one request replenished
    // every 2 seconds, bursts of up to 10
    let mut auth = auth_routes();
    if rate_limit_enabled {
        // Client IP from X-Forwarded-For / X-Real-IP, falling back to the peer address
        match GovernorConfigBuilder::default()
            .key_extractor(SmartIpKeyExtractor)
            .per_second(2)
            .burst_size(10)
            .use_headers()
            .finish()
        {
            Some(rate_limit_config) => {
                auth = auth.layer(GovernorLayer {
                    config: Arc::new(rate_limit_config),
                });
            }
            None => warn!("Invalid rate limiter configuration, auth routes are not rate limited"),
        }
    }

    Router::new()
        .nest("/api", api_routes().nest("/auth", auth))
        // Health check (no auth, no rate limit)
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service_for_middleware.clone(), req, next)
        })) // JWT authentication
        .layer(Extension(app_state)) // Shared state
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
