//! Ads

use crate::context::SdkContext;
use solis_bridge::Operation;
use solis_core::ModuleResult;
use std::sync::Arc;
use tracing::info;

const MODULE: &str = "Ads";

pub struct Ads {
    ctx: Arc<SdkContext>,
}

impl Ads {
    pub(crate) fn new(ctx: Arc<SdkContext>) -> Self {
        Self { ctx }
    }

    /// Show a rewarded ad; true only when the player watched it to the end.
    ///
    /// A skipped ad is `Ok(false)`, not a failure.
    pub async fn show_rewarded(&self) -> ModuleResult<bool> {
        let watched = self
            .ctx
            .call(MODULE, Operation::ShowRewardedAd, Vec::new(), || true)
            .await?;
        if !watched {
            info!(module = MODULE, "Rewarded ad not watched to the end");
        }
        Ok(watched)
    }

    pub async fn show_interstitial(&self) -> ModuleResult<bool> {
        self.ctx
            .call_flag(MODULE, Operation::ShowInterstitialAd, Vec::new())
            .await
    }
}
