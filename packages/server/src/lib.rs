// ToyShare - API Core
//
// Backend for a community toy-sharing marketplace: toy listings with
// geo-distance browsing, messaging, exchange requests, and sustainability
// tracking (scores, badges, leaderboards, community totals).

pub mod common;
pub mod config;
pub mod domains;
pub mod server;

pub use config::*;
