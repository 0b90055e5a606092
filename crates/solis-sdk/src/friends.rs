//! Friends and presence

use crate::context::SdkContext;
use crate::validate;
use solis_bridge::Operation;
use solis_core::{Friend, ModuleResult, Presence};
use std::sync::Arc;

const MODULE: &str = "Friends";

pub struct Friends {
    ctx: Arc<SdkContext>,
}

impl Friends {
    pub(crate) fn new(ctx: Arc<SdkContext>) -> Self {
        Self { ctx }
    }

    pub async fn list(&self) -> ModuleResult<Vec<Friend>> {
        self.ctx
            .call(MODULE, Operation::FriendsList, Vec::new(), || mock_friends(false))
            .await
    }

    pub async fn add(&self, user_id: &str) -> ModuleResult<bool> {
        self.by_user(Operation::FriendsAdd, user_id).await
    }

    pub async fn remove(&self, user_id: &str) -> ModuleResult<bool> {
        self.by_user(Operation::FriendsRemove, user_id).await
    }

    /// Friends currently online
    pub async fn get_online(&self) -> ModuleResult<Vec<Friend>> {
        self.ctx
            .call(MODULE, Operation::FriendsGetOnline, Vec::new(), || mock_friends(true))
            .await
    }

    /// Publish the current player's presence
    pub async fn update_presence(&self, presence: &Presence) -> ModuleResult<bool> {
        let op = Operation::FriendsUpdatePresence;
        let args = self.ctx.prepare(MODULE, op, || {
            validate::required("status", &presence.status)?;
            Ok(vec![
                presence.status.clone().into(),
                presence.activity.clone().unwrap_or_default().into(),
                presence.joinable.into(),
            ])
        })?;
        self.ctx.call_flag(MODULE, op, args).await
    }

    async fn by_user(&self, op: Operation, user_id: &str) -> ModuleResult<bool> {
        let args = self.ctx.prepare(MODULE, op, || {
            validate::required("userId", user_id)?;
            Ok(vec![user_id.into()])
        })?;
        self.ctx.call_flag(MODULE, op, args).await
    }
}

fn mock_friends(online_only: bool) -> Vec<Friend> {
    let friends = vec![
        Friend {
            user_id: "mock_friend_1".into(),
            username: "Aria".into(),
            online: true,
            presence: Some(Presence {
                status: "in_game".into(),
                activity: Some("Level 3".into()),
                joinable: true,
            }),
        },
        Friend {
            user_id: "mock_friend_2".into(),
            username: "Bram".into(),
            online: false,
            presence: None,
        },
    ];
    if online_only {
        friends.into_iter().filter(|f| f.online).collect()
    } else {
        friends
    }
}
