//! Chat messages

use crate::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub channel: String,
    pub sender_id: UserId,
    pub sender_name: String,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}
