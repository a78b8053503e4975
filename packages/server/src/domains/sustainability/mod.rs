//! Sustainability domain - scores, badge tiers, leaderboard and community totals

pub mod actions;
pub mod data;
pub mod edges;
pub mod models;
pub mod scoring;
