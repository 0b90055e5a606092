//! Leaderboards
//!
//! Submission results may come back `flagged` by the platform's anti-cheat;
//! that is a successful call, not an error.

use crate::context::SdkContext;
use crate::validate;
use rand::Rng;
use serde_json::Value;
use solis_bridge::Operation;
use solis_core::{LeaderboardEntry, LeaderboardPage, ModuleResult, SubmitScoreResult};
use std::collections::HashMap;
use std::sync::Arc;

const MODULE: &str = "Leaderboards";

/// Mock pages never grow past this many entries
const MOCK_PAGE_CAP: u32 = 50;

/// Size of the simulated board
const MOCK_TOTAL: u32 = 1000;

pub struct Leaderboards {
    ctx: Arc<SdkContext>,
}

impl Leaderboards {
    pub(crate) fn new(ctx: Arc<SdkContext>) -> Self {
        Self { ctx }
    }

    pub async fn submit_score(
        &self,
        leaderboard_id: &str,
        score: i64,
    ) -> ModuleResult<SubmitScoreResult> {
        self.submit_score_with_metadata(leaderboard_id, score, None)
            .await
    }

    /// Submit a score with free-form metadata (replay id, character, ...)
    pub async fn submit_score_with_metadata(
        &self,
        leaderboard_id: &str,
        score: i64,
        metadata: Option<&HashMap<String, Value>>,
    ) -> ModuleResult<SubmitScoreResult> {
        let op = Operation::LeaderboardSubmit;
        let args = self.ctx.prepare(MODULE, op, || {
            validate::required("leaderboardId", leaderboard_id)?;
            Ok(vec![
                leaderboard_id.into(),
                score.into(),
                validate::json_or_empty(metadata)?.into(),
            ])
        })?;

        let id = leaderboard_id.to_string();
        self.ctx
            .call(MODULE, op, args, move || {
                let mut rng = rand::thread_rng();
                SubmitScoreResult {
                    leaderboard_id: id,
                    score,
                    rank: rng.gen_range(1..=100),
                    is_new_best: rng.gen_bool(0.5),
                    previous_best: None,
                    flagged: false,
                    flag_reason: None,
                }
            })
            .await
    }

    /// Page of entries ordered by rank, starting after `offset`
    pub async fn get_scores(
        &self,
        leaderboard_id: &str,
        limit: u32,
        offset: u32,
    ) -> ModuleResult<LeaderboardPage> {
        let op = Operation::LeaderboardGet;
        let args = self.ctx.prepare(MODULE, op, || {
            validate::required("leaderboardId", leaderboard_id)?;
            validate::positive("limit", limit)?;
            Ok(vec![leaderboard_id.into(), limit.into(), offset.into()])
        })?;

        let id = leaderboard_id.to_string();
        self.ctx
            .call(MODULE, op, args, move || {
                // Past the end of the board the page is empty
                let count = limit
                    .min(MOCK_PAGE_CAP)
                    .min(MOCK_TOTAL.saturating_sub(offset));
                mock_page(id, offset.saturating_add(1), count)
            })
            .await
    }

    /// Entries within `range` ranks of the current player
    pub async fn get_nearby(
        &self,
        leaderboard_id: &str,
        range: u32,
    ) -> ModuleResult<LeaderboardPage> {
        let op = Operation::LeaderboardGetNearby;
        let args = self.ctx.prepare(MODULE, op, || {
            validate::required("leaderboardId", leaderboard_id)?;
            validate::positive("range", range)?;
            Ok(vec![leaderboard_id.into(), range.into()])
        })?;

        let id = leaderboard_id.to_string();
        self.ctx
            .call(MODULE, op, args, move || {
                let range = range.min(MOCK_PAGE_CAP / 2);
                let player_rank = rand::thread_rng().gen_range(1..=MOCK_TOTAL / 2);
                let first = player_rank.saturating_sub(range).max(1);
                let count = player_rank + range - first + 1;
                mock_page(id, first, count)
            })
            .await
    }
}

/// `count` consecutive ranks starting at `first_rank`, stopping at `u32::MAX`
fn mock_page(leaderboard_id: String, first_rank: u32, count: u32) -> LeaderboardPage {
    let mut rng = rand::thread_rng();
    let mut score: i64 = rng.gen_range(50_000..100_000) - i64::from(first_rank) * 50;
    let entries = (first_rank..=u32::MAX)
        .take(count as usize)
        .map(|rank| {
            score -= rng.gen_range(0..50);
            LeaderboardEntry {
                rank,
                user_id: format!("mock_user_{}", rank),
                username: format!("Player{}", rank),
                score,
                metadata: HashMap::new(),
            }
        })
        .collect();

    LeaderboardPage {
        leaderboard_id,
        entries,
        total: Some(u64::from(MOCK_TOTAL)),
    }
}
