//! Achievement results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub unlocked: bool,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub target: Option<f64>,
    #[serde(default)]
    pub unlocked_at: Option<DateTime<Utc>>,
}

/// Outcome of an unlock call; `already_unlocked` is not an error
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UnlockResult {
    pub achievement_id: String,
    pub unlocked: bool,
    #[serde(default)]
    pub already_unlocked: bool,
    #[serde(default)]
    pub unlocked_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResult {
    pub achievement_id: String,
    pub progress: f64,
    #[serde(default)]
    pub unlocked: bool,
}
