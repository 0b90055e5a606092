//! Signed-in player

use crate::context::SdkContext;
use solis_bridge::Operation;
use solis_core::{ModuleResult, UserProfile};
use std::sync::Arc;

const MODULE: &str = "User";

pub struct User {
    ctx: Arc<SdkContext>,
}

impl User {
    pub(crate) fn new(ctx: Arc<SdkContext>) -> Self {
        Self { ctx }
    }

    /// Profile of the current player
    pub async fn get_user(&self) -> ModuleResult<UserProfile> {
        self.ctx
            .call(MODULE, Operation::GetUser, Vec::new(), mock_profile)
            .await
    }
}

fn mock_profile() -> UserProfile {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    UserProfile {
        id: format!("mock_user_{}", &suffix[..8]),
        username: "MockPlayer".into(),
        display_name: Some("Mock Player".into()),
        avatar_url: None,
        is_guest: false,
    }
}
