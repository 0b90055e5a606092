//! Leaderboard results

use crate::user::UserId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One ranked row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: UserId,
    pub username: String,
    pub score: i64,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// A page of rankings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardPage {
    pub leaderboard_id: String,
    pub entries: Vec<LeaderboardEntry>,
    /// Total ranked players, when the platform reports it
    #[serde(default)]
    pub total: Option<u64>,
}

impl LeaderboardPage {
    /// Whether entries are ordered by non-decreasing rank starting at 1
    pub fn is_well_ordered(&self) -> bool {
        self.entries.iter().all(|e| e.rank >= 1)
            && self.entries.windows(2).all(|w| w[0].rank <= w[1].rank)
    }
}

/// Outcome of a score submission
///
/// `flagged` is a platform verdict carried as data: the call succeeded, the
/// score is held for review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreResult {
    pub leaderboard_id: String,
    pub score: i64,
    pub rank: u32,
    #[serde(default)]
    pub is_new_best: bool,
    #[serde(default)]
    pub previous_best: Option<i64>,
    #[serde(default)]
    pub flagged: bool,
    #[serde(default)]
    pub flag_reason: Option<String>,
}
