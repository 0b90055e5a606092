//! Friends and presence

use crate::user::UserId;
use serde::{Deserialize, Serialize};

/// Presence as published by a player; `joinable` is platform-defined
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Presence {
    pub status: String,
    #[serde(default)]
    pub activity: Option<String>,
    #[serde(default)]
    pub joinable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    pub user_id: UserId,
    pub username: String,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub presence: Option<Presence>,
}
