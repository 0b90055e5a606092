//! Achievements

use crate::context::SdkContext;
use crate::validate;
use chrono::Utc;
use solis_bridge::Operation;
use solis_core::{Achievement, ModuleResult, ProgressResult, UnlockResult};
use std::sync::Arc;

const MODULE: &str = "Achievements";

/// Progress at which an incremental achievement counts as unlocked in mocks
const MOCK_COMPLETE: f64 = 100.0;

pub struct Achievements {
    ctx: Arc<SdkContext>,
}

impl Achievements {
    pub(crate) fn new(ctx: Arc<SdkContext>) -> Self {
        Self { ctx }
    }

    /// Unlock an achievement.
    ///
    /// Unlocking twice is not an error; the result reports `already_unlocked`.
    pub async fn unlock(&self, achievement_id: &str) -> ModuleResult<UnlockResult> {
        let op = Operation::AchievementUnlock;
        let args = self.ctx.prepare(MODULE, op, || {
            validate::required("achievementId", achievement_id)?;
            Ok(vec![achievement_id.into()])
        })?;

        let id = achievement_id.to_string();
        self.ctx
            .call(MODULE, op, args, move || UnlockResult {
                achievement_id: id,
                unlocked: true,
                already_unlocked: false,
                unlocked_at: Some(Utc::now()),
            })
            .await
    }

    pub async fn update_progress(
        &self,
        achievement_id: &str,
        progress: f64,
    ) -> ModuleResult<ProgressResult> {
        let op = Operation::AchievementUpdateProgress;
        let args = self.ctx.prepare(MODULE, op, || {
            validate::required("achievementId", achievement_id)?;
            validate::finite_non_negative("progress", progress)?;
            Ok(vec![achievement_id.into(), progress.into()])
        })?;

        let id = achievement_id.to_string();
        self.ctx
            .call(MODULE, op, args, move || ProgressResult {
                achievement_id: id,
                progress,
                unlocked: progress >= MOCK_COMPLETE,
            })
            .await
    }

    pub async fn list(&self) -> ModuleResult<Vec<Achievement>> {
        self.ctx
            .call(MODULE, Operation::AchievementList, Vec::new(), mock_achievements)
            .await
    }
}

fn mock_achievements() -> Vec<Achievement> {
    vec![
        Achievement {
            id: "first_win".into(),
            name: "First Victory".into(),
            description: "Win your first match".into(),
            unlocked: true,
            progress: MOCK_COMPLETE,
            target: None,
            unlocked_at: Some(Utc::now()),
        },
        Achievement {
            id: "collector".into(),
            name: "Collector".into(),
            description: "Collect 100 coins".into(),
            unlocked: false,
            progress: 42.0,
            target: Some(MOCK_COMPLETE),
            unlocked_at: None,
        },
        Achievement {
            id: "marathon".into(),
            name: "Marathon".into(),
            description: "Play for 10 hours".into(),
            unlocked: false,
            progress: 0.0,
            target: Some(MOCK_COMPLETE),
            unlocked_at: None,
        },
    ]
}
