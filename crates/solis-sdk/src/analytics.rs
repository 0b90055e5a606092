//! Analytics events

use crate::context::SdkContext;
use crate::validate;
use serde::Serialize;
use solis_bridge::Operation;
use solis_core::ModuleResult;
use std::sync::Arc;

const MODULE: &str = "Analytics";

pub struct Analytics {
    ctx: Arc<SdkContext>,
}

impl Analytics {
    pub(crate) fn new(ctx: Arc<SdkContext>) -> Self {
        Self { ctx }
    }

    pub async fn track_event(&self, event_name: &str) -> ModuleResult<bool> {
        self.send(event_name, None::<&()>).await
    }

    /// Track an event with a property map (any map-like serializable value)
    pub async fn track_event_with<P: Serialize + ?Sized>(
        &self,
        event_name: &str,
        properties: &P,
    ) -> ModuleResult<bool> {
        self.send(event_name, Some(properties)).await
    }

    async fn send<P: Serialize + ?Sized>(
        &self,
        event_name: &str,
        properties: Option<&P>,
    ) -> ModuleResult<bool> {
        let op = Operation::TrackEvent;
        let args = self.ctx.prepare(MODULE, op, || {
            validate::required("eventName", event_name)?;
            Ok(vec![
                event_name.into(),
                validate::json_or_empty(properties)?.into(),
            ])
        })?;
        self.ctx.call_flag(MODULE, op, args).await
    }
}
