//! Test harness with testcontainers for integration testing.
//!
//! One Postgres container is shared by every test in the binary. It is
//! started and migrated on first use, then reused. Tests create their own
//! uniquely named users and toys so they do not collide.

use anyhow::{Context, Result};
use axum::Router;
use sqlx::PgPool;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use toyshare_core::domains::auth::JwtService;
use toyshare_core::domains::users::models::User;
use toyshare_core::server::build_app;
use toyshare_core::Config;

use super::ApiClient;

pub const TEST_JWT_SECRET: &str = "test-secret-key";
pub const TEST_JWT_ISSUER: &str = "toyshare-test";
/// Registering with this email grants admin rights
pub const TEST_ADMIN_EMAIL: &str = "admin@toyshare.test";

struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .with_cmd(["-c", "max_connections=200"])
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Per-test context: a fresh pool plus an in-process router over it.
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let response = ctx.client().get("/health").await;
///     assert_eq!(response.status, StatusCode::OK);
/// }
/// ```
pub struct TestHarness {
    pub db_pool: PgPool,
    pub config: Config,
    jwt_service: JwtService,
    app: Router,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        self.db_pool.close().await;
    }
}

impl TestHarness {
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;

        let db_pool = PgPool::connect(&infra.db_url)
            .await
            .context("Failed to connect to test database")?;

        let config = test_config(&infra.db_url);
        let jwt_service = JwtService::new(
            &config.jwt_secret,
            config.jwt_issuer.clone(),
            config.session_ttl_hours,
        );
        let app = build_app(db_pool.clone(), config.clone());

        Ok(Self {
            db_pool,
            config,
            jwt_service,
            app,
        })
    }

    /// Anonymous client
    pub fn client(&self) -> ApiClient {
        ApiClient::new(self.app.clone())
    }

    /// Client authenticated as `user` via a Bearer token
    pub fn client_as(&self, user: &User) -> ApiClient {
        self.client().with_token(self.token_for(user))
    }

    pub fn token_for(&self, user: &User) -> String {
        self.jwt_service
            .create_token(user.id, user.username.clone(), user.is_admin)
            .expect("Failed to create test token")
    }
}

fn test_config(db_url: &str) -> Config {
    Config {
        database_url: db_url.to_string(),
        port: 0,
        database_max_connections: 5,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_issuer: TEST_JWT_ISSUER.to_string(),
        session_ttl_hours: 1,
        allowed_origins: Vec::new(),
        admin_emails: vec![TEST_ADMIN_EMAIL.to_string()],
        geocoding_enabled: false,
        // The governor needs a client IP, which oneshot requests lack
        rate_limit_enabled: false,
    }
}
