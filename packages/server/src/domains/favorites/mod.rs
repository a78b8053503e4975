//! Favorites domain - toys a member has saved

pub mod edges;
pub mod models;
