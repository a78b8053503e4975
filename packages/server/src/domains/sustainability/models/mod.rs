pub mod community_metrics;
pub mod user_badge;

pub use community_metrics::*;
pub use user_badge::*;
