//! Exchanges domain - requests to swap toys and their lifecycle

pub mod actions;
pub mod data;
pub mod edges;
pub mod models;
