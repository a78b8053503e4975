//! Users domain - profiles and public user data

pub mod actions;
pub mod data;
pub mod edges;
pub mod models;
