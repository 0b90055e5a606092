//! Player profile

use serde::{Deserialize, Serialize};

/// Platform user identifier
pub type UserId = String;

/// Profile of the signed-in player
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_guest: bool,
}

impl UserProfile {
    /// Name to show in UI, falling back to the username
    pub fn shown_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}
