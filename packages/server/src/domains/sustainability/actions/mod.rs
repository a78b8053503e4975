//! Sustainability actions
//!
//! Side effects of listing and exchange writes. Each function takes the
//! caller's transaction so counters, score, badge and community totals move
//! together with the triggering write.

mod recompute;
mod side_effects;
mod stats;

pub use recompute::{recompute_all, recompute_user, RecomputeSummary};
pub use side_effects::{record_exchange_completed, record_toy_removed, record_toy_shared};
pub use stats::{community_stats, leaderboard, DEFAULT_LEADERBOARD_LIMIT, MAX_LEADERBOARD_LIMIT};
