//! Test fixtures for creating test data.
//!
//! Users are inserted directly through the model; toys go through the
//! create action so the sustainability side effects run as in production.

use anyhow::Result;
use sqlx::PgPool;
use toyshare_core::common::UserId;
use toyshare_core::domains::auth::password::hash_password;
use toyshare_core::domains::toys::actions::create_toy;
use toyshare_core::domains::toys::data::CreateToyInput;
use toyshare_core::domains::toys::models::Toy;
use toyshare_core::domains::users::models::{NewUser, User};
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

pub const MINNEAPOLIS: (f64, f64) = (44.98, -93.27);
pub const ST_PAUL: (f64, f64) = (44.95, -93.09);
pub const DULUTH: (f64, f64) = (46.79, -92.10);

/// Short random suffix so names stay unique across tests sharing a database
pub fn unique(prefix: &str) -> String {
    format!("{}_{}", prefix, &Uuid::new_v4().simple().to_string()[..10])
}

pub async fn create_test_user(pool: &PgPool, prefix: &str) -> Result<User> {
    insert_user(pool, prefix, false).await
}

pub async fn create_test_admin(pool: &PgPool) -> Result<User> {
    insert_user(pool, "admin", true).await
}

async fn insert_user(pool: &PgPool, prefix: &str, is_admin: bool) -> Result<User> {
    let username = unique(prefix);
    User::insert(
        NewUser {
            email: format!("{}@example.com", username),
            username: username.clone(),
            password_hash: hash_password(TEST_PASSWORD)?,
            name: format!("Test {}", prefix),
            location: Some("Minneapolis, MN".to_string()),
            latitude: Some(MINNEAPOLIS.0),
            longitude: Some(MINNEAPOLIS.1),
            is_admin,
        },
        pool,
    )
    .await
}

pub fn toy_input(title: &str, tag: &str, coords: Option<(f64, f64)>) -> CreateToyInput {
    CreateToyInput {
        title: title.to_string(),
        description: format!("{} in great shape", title),
        age_range: "3-5".to_string(),
        condition: "good".to_string(),
        category: "puzzles".to_string(),
        tags: vec![tag.to_string()],
        images: Vec::new(),
        location: None,
        latitude: coords.map(|c| c.0),
        longitude: coords.map(|c| c.1),
    }
}

/// Create a toy through the action (counts toward the owner's score)
pub async fn create_test_toy(
    pool: &PgPool,
    owner_id: UserId,
    title: &str,
    tag: &str,
    coords: Option<(f64, f64)>,
) -> Result<Toy> {
    create_toy(owner_id, toy_input(title, tag, coords), None, pool).await
}

pub async fn reload_user(pool: &PgPool, user: &User) -> Result<User> {
    User::find_by_id(user.id, pool).await
}
