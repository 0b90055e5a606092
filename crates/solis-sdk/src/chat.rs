//! Chat channels

use crate::context::SdkContext;
use crate::validate;
use chrono::{Duration, Utc};
use solis_bridge::Operation;
use solis_core::{ChatMessage, ModuleResult};
use std::sync::Arc;
use uuid::Uuid;

const MODULE: &str = "Chat";

pub struct Chat {
    ctx: Arc<SdkContext>,
}

impl Chat {
    pub(crate) fn new(ctx: Arc<SdkContext>) -> Self {
        Self { ctx }
    }

    /// Post `text` to `channel`; returns the message as stored by the platform
    pub async fn send(&self, channel: &str, text: &str) -> ModuleResult<ChatMessage> {
        let op = Operation::ChatSend;
        let args = self.ctx.prepare(MODULE, op, || {
            validate::required("channel", channel)?;
            validate::required("message", text)?;
            Ok(vec![channel.into(), text.into()])
        })?;

        let channel = channel.to_string();
        let text = text.to_string();
        self.ctx
            .call(MODULE, op, args, move || ChatMessage {
                id: Uuid::new_v4().to_string(),
                channel,
                sender_id: "mock_user".into(),
                sender_name: "MockPlayer".into(),
                text,
                sent_at: Utc::now(),
            })
            .await
    }

    /// Most recent messages in `channel`, oldest first
    pub async fn get_history(&self, channel: &str, limit: u32) -> ModuleResult<Vec<ChatMessage>> {
        let op = Operation::ChatGetHistory;
        let args = self.ctx.prepare(MODULE, op, || {
            validate::required("channel", channel)?;
            validate::positive("limit", limit)?;
            Ok(vec![channel.into(), limit.into()])
        })?;

        let channel = channel.to_string();
        self.ctx
            .call(MODULE, op, args, move || {
                let now = Utc::now();
                let count = limit.min(5);
                (0..count)
                    .map(|i| ChatMessage {
                        id: Uuid::new_v4().to_string(),
                        channel: channel.clone(),
                        sender_id: format!("mock_user_{}", i % 2),
                        sender_name: format!("Player{}", i % 2 + 1),
                        text: format!("Mock message {}", i + 1),
                        sent_at: now - Duration::minutes(i64::from(count - i)),
                    })
                    .collect::<Vec<_>>()
            })
            .await
    }
}
