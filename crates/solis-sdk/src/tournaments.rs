//! Tournaments

use crate::context::SdkContext;
use crate::validate;
use chrono::{Duration, Utc};
use solis_bridge::Operation;
use solis_core::{
    Bracket, BracketMatch, BracketRound, ModuleResult, Tournament, TournamentStatus,
};
use std::sync::Arc;

const MODULE: &str = "Tournaments";

pub struct Tournaments {
    ctx: Arc<SdkContext>,
}

impl Tournaments {
    pub(crate) fn new(ctx: Arc<SdkContext>) -> Self {
        Self { ctx }
    }

    /// Enter the current player; true when the platform accepted the entry
    pub async fn join(&self, tournament_id: &str) -> ModuleResult<bool> {
        let op = Operation::TournamentJoin;
        let args = self.ctx.prepare(MODULE, op, || {
            validate::required("tournamentId", tournament_id)?;
            Ok(vec![tournament_id.into()])
        })?;
        self.ctx.call_flag(MODULE, op, args).await
    }

    pub async fn list(&self) -> ModuleResult<Vec<Tournament>> {
        self.ctx
            .call(MODULE, Operation::TournamentList, Vec::new(), mock_tournaments)
            .await
    }

    pub async fn get_bracket(&self, tournament_id: &str) -> ModuleResult<Bracket> {
        let op = Operation::TournamentGetBracket;
        let args = self.ctx.prepare(MODULE, op, || {
            validate::required("tournamentId", tournament_id)?;
            Ok(vec![tournament_id.into()])
        })?;

        let id = tournament_id.to_string();
        self.ctx
            .call(MODULE, op, args, move || mock_bracket(id))
            .await
    }
}

fn mock_tournaments() -> Vec<Tournament> {
    let now = Utc::now();
    vec![
        Tournament {
            id: "weekly_cup".into(),
            name: "Weekly Cup".into(),
            status: TournamentStatus::Active,
            starts_at: Some(now - Duration::days(1)),
            ends_at: Some(now + Duration::days(6)),
            participants: 24,
            max_participants: Some(64),
        },
        Tournament {
            id: "monthly_open".into(),
            name: "Monthly Open".into(),
            status: TournamentStatus::Upcoming,
            starts_at: Some(now + Duration::days(3)),
            ends_at: Some(now + Duration::days(33)),
            participants: 0,
            max_participants: None,
        },
    ]
}

/// Four-player single elimination with the final still open
fn mock_bracket(tournament_id: String) -> Bracket {
    let semi = |n: u32, a: &str, b: &str, winner: &str| BracketMatch {
        id: format!("r1m{}", n),
        player_a: Some(a.into()),
        player_b: Some(b.into()),
        winner: Some(winner.into()),
    };
    Bracket {
        tournament_id,
        rounds: vec![
            BracketRound {
                round: 1,
                matches: vec![
                    semi(1, "Player1", "Player4", "Player1"),
                    semi(2, "Player2", "Player3", "Player3"),
                ],
            },
            BracketRound {
                round: 2,
                matches: vec![BracketMatch {
                    id: "r2m1".into(),
                    player_a: Some("Player1".into()),
                    player_b: Some("Player3".into()),
                    winner: None,
                }],
            },
        ],
    }
}
