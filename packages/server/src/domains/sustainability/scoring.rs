//! Sustainability score and badge tiers.
//!
//! Everything here is a pure function of a user's accumulated counters, so
//! the stored score can always be rebuilt from `toys_shared` and
//! `successful_exchanges`.

use serde::{Deserialize, Serialize};

pub const POINTS_PER_TOY_SHARED: i32 = 10;
pub const POINTS_PER_EXCHANGE: i32 = 25;

/// Score for the given counters. Negative counters count as zero.
pub fn compute_score(toys_shared: i32, successful_exchanges: i32) -> i32 {
    let toys = toys_shared.max(0);
    let exchanges = successful_exchanges.max(0);

    toys.saturating_mul(POINTS_PER_TOY_SHARED)
        .saturating_add(exchanges.saturating_mul(POINTS_PER_EXCHANGE))
}

/// Badge tiers, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    Seedling,
    Sprout,
    Sapling,
    Oak,
    ForestGuardian,
}

impl Badge {
    pub const ALL: [Badge; 5] = [
        Badge::Seedling,
        Badge::Sprout,
        Badge::Sapling,
        Badge::Oak,
        Badge::ForestGuardian,
    ];

    /// Minimum score for this tier
    pub fn threshold(self) -> i32 {
        match self {
            Badge::Seedling => 0,
            Badge::Sprout => 25,
            Badge::Sapling => 100,
            Badge::Oak => 250,
            Badge::ForestGuardian => 500,
        }
    }

    /// Highest tier whose threshold the score reaches
    pub fn for_score(score: i32) -> Self {
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|badge| score >= badge.threshold())
            .unwrap_or(Badge::Seedling)
    }

    pub fn next(self) -> Option<Self> {
        let idx = Self::ALL.iter().position(|b| *b == self)?;
        Self::ALL.get(idx + 1).copied()
    }

    /// This tier and every tier below it
    pub fn earned_through(self) -> impl Iterator<Item = Badge> {
        Self::ALL.into_iter().filter(move |b| *b <= self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Badge::Seedling => "seedling",
            Badge::Sprout => "sprout",
            Badge::Sapling => "sapling",
            Badge::Oak => "oak",
            Badge::ForestGuardian => "forest_guardian",
        }
    }

    /// Human-readable name
    pub fn label(self) -> &'static str {
        match self {
            Badge::Seedling => "Seedling",
            Badge::Sprout => "Sprout",
            Badge::Sapling => "Sapling",
            Badge::Oak => "Mighty Oak",
            Badge::ForestGuardian => "Forest Guardian",
        }
    }
}

impl std::fmt::Display for Badge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Badge {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Invalid badge: {}", s))
    }
}

/// Score, tier and progress derived from a user's counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SustainabilitySnapshot {
    pub toys_shared: i32,
    pub successful_exchanges: i32,
    pub score: i32,
    pub badge: Badge,
    pub next_badge: Option<Badge>,
    pub points_to_next: Option<i32>,
}

impl SustainabilitySnapshot {
    pub fn from_counters(toys_shared: i32, successful_exchanges: i32) -> Self {
        let score = compute_score(toys_shared, successful_exchanges);
        let badge = Badge::for_score(score);
        let next_badge = badge.next();

        Self {
            toys_shared: toys_shared.max(0),
            successful_exchanges: successful_exchanges.max(0),
            score,
            badge,
            next_badge,
            points_to_next: next_badge.map(|next| next.threshold() - score),
        }
    }
}
