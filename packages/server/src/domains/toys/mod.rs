//! Toys domain - listings, browse filters and geo search

pub mod actions;
pub mod data;
pub mod edges;
pub mod filters;
pub mod models;
