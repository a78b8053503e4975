// Common types and utilities shared across the application

pub mod auth;
pub mod entity_ids;
pub mod error;
pub mod extract;
pub mod id;
pub mod pagination;
pub mod utils;

pub use auth::{Actor, AuthError, Capability};
pub use entity_ids::*;
pub use error::ApiError;
pub use extract::ApiPath;
pub use id::{Id, V4, V7};
pub use pagination::{Page, PageParams};
