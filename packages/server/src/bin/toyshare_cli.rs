//! Operational CLI for ToyShare
//!
//! Output is JSON so it can be piped into other tools.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use sqlx::PgPool;
use toyshare_core::config::Config;
use toyshare_core::domains::sustainability::actions::{community_stats, recompute_all};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "toyshare_cli")]
#[command(about = "ToyShare maintenance commands")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run pending database migrations
    Migrate,

    /// Rebuild counters, scores, badges and community totals
    Recompute,

    /// Print community totals
    Stats,
}

#[derive(Serialize)]
struct Response<T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<T>,
}

fn output<T: Serialize>(message: Option<&str>, result: Option<T>) -> Result<()> {
    let resp = Response {
        success: true,
        message: message.map(str::to_string),
        result,
    };
    println!("{}", serde_json::to_string(&resp)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,toyshare_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let pool = get_pool().await?;

    match cli.command {
        Commands::Migrate => cmd_migrate(&pool).await,
        Commands::Recompute => cmd_recompute(&pool).await,
        Commands::Stats => cmd_stats(&pool).await,
    }
}

async fn get_pool() -> Result<PgPool> {
    let config = Config::from_env()?;
    PgPool::connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

async fn cmd_migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run migrations")?;
    output::<()>(Some("Migrations complete"), None)
}

async fn cmd_recompute(pool: &PgPool) -> Result<()> {
    let summary = recompute_all(pool)
        .await
        .context("Failed to recompute sustainability metrics")?;
    output(Some("Sustainability metrics rebuilt"), Some(summary))
}

async fn cmd_stats(pool: &PgPool) -> Result<()> {
    let stats = community_stats(pool)
        .await
        .context("Failed to load community stats")?;
    output(None, Some(stats))
}
