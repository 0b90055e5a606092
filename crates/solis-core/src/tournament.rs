//! Tournament listings and brackets

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    Upcoming,
    Active,
    Completed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: String,
    pub name: String,
    pub status: TournamentStatus,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub participants: u32,
    #[serde(default)]
    pub max_participants: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BracketMatch {
    pub id: String,
    #[serde(default)]
    pub player_a: Option<String>,
    #[serde(default)]
    pub player_b: Option<String>,
    #[serde(default)]
    pub winner: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BracketRound {
    pub round: u32,
    pub matches: Vec<BracketMatch>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bracket {
    pub tournament_id: String,
    pub rounds: Vec<BracketRound>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_tolerated() {
        let json = r#"{"id":"t1","name":"Cup","status":"paused","participants":8}"#;
        let tournament: Tournament = serde_json::from_str(json).unwrap();
        assert_eq!(tournament.status, TournamentStatus::Unknown);
        assert!(tournament.starts_at.is_none());
    }
}
