//! Standing model — one row of the final ranking table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{PlayerId, RankingSystem};

/// A player's aggregate result and final rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub player: PlayerId,

    /// 1-based, unique across the table
    pub rank: u32,

    /// Plain score
    pub score: f64,

    pub wins: u32,

    pub black_times: u32,

    /// Values of the configured tie-break criteria
    #[serde(default)]
    pub tie_breaks: BTreeMap<RankingSystem, f64>,
}

impl Standing {
    pub fn tie_break(&self, criterion: RankingSystem) -> Option<f64> {
        self.tie_breaks.get(&criterion).copied()
    }
}
