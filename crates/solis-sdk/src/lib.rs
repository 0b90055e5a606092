//! # solis-sdk
//!
//! Typed entry points for the Solis Games platform.
//!
//! A `SolisSdk` is built once at startup and owns every facade. Each facade
//! validates its arguments, checks that the SDK is initialized, then hands the
//! call to the dual-mode executor: dispatched to the hosted JavaScript SDK in
//! production, answered by a per-operation mock in development.
//!
//! ```no_run
//! use solis_core::SdkConfig;
//! use solis_sdk::SolisSdk;
//!
//! # async fn run() -> solis_core::Result<()> {
//! let sdk = SolisSdk::development(SdkConfig::with_api_key("pk_test"));
//! if sdk.initialize().await {
//!     let result = sdk.leaderboards().submit_score("high_scores", 9500).await?;
//!     println!("rank {}", result.rank);
//! }
//! # Ok(())
//! # }
//! ```

pub mod achievements;
pub mod ads;
pub mod analytics;
pub mod chat;
pub mod cloud_save;
pub mod context;
pub mod friends;
pub mod leaderboards;
pub mod tournaments;
pub mod user;
mod validate;

pub use achievements::Achievements;
pub use ads::Ads;
pub use analytics::Analytics;
pub use chat::Chat;
pub use cloud_save::CloudSave;
pub use context::SdkContext;
pub use friends::Friends;
pub use leaderboards::Leaderboards;
pub use tournaments::Tournaments;
pub use user::User;

use solis_bridge::{
    CorrelationRegistry, Dispatcher, DualModeExecutor, ExecutionStrategy, ExternalRuntime,
    InitializationGate, InitializationState, SocketRuntime, SocketRuntimeConfig,
};
use solis_core::{BridgeError, ExecutionMode, Result, SdkConfig};
use std::sync::Arc;
use tracing::info;

/// The SDK context plus its nine facades
pub struct SolisSdk {
    ctx: Arc<SdkContext>,
    runtime: Option<Arc<SocketRuntime>>,
    user: User,
    leaderboards: Leaderboards,
    achievements: Achievements,
    tournaments: Tournaments,
    cloud_save: CloudSave,
    ads: Ads,
    analytics: Analytics,
    friends: Friends,
    chat: Chat,
}

impl SolisSdk {
    fn assemble(
        ctx: SdkContext,
        runtime: Option<Arc<SocketRuntime>>,
    ) -> Self {
        let ctx = Arc::new(ctx);
        Self {
            user: User::new(ctx.clone()),
            leaderboards: Leaderboards::new(ctx.clone()),
            achievements: Achievements::new(ctx.clone()),
            tournaments: Tournaments::new(ctx.clone()),
            cloud_save: CloudSave::new(ctx.clone()),
            ads: Ads::new(ctx.clone()),
            analytics: Analytics::new(ctx.clone()),
            friends: Friends::new(ctx.clone()),
            chat: Chat::new(ctx.clone()),
            runtime,
            ctx,
        }
    }

    /// SDK answering every call from mocks
    pub fn development(config: SdkConfig) -> Self {
        let executor = DualModeExecutor::development(&config);
        Self::assemble(SdkContext::new(config, executor, None), None)
    }

    /// SDK dispatching through `dispatcher`
    pub fn production(config: SdkConfig, dispatcher: Dispatcher) -> Self {
        let registry = dispatcher.registry().clone();
        let executor = DualModeExecutor::production(dispatcher, &config);
        Self::assemble(SdkContext::new(config, executor, Some(registry)), None)
    }

    /// SDK dispatching to `runtime`, which must reply into `registry`
    pub fn with_runtime(
        config: SdkConfig,
        runtime: Arc<dyn ExternalRuntime>,
        registry: CorrelationRegistry,
    ) -> Self {
        let dispatcher = Dispatcher::new(runtime, registry, config.request_timeout());
        Self::production(config, dispatcher)
    }

    /// SDK driven by a custom execution strategy
    pub fn with_strategy(config: SdkConfig, strategy: Arc<dyn ExecutionStrategy>) -> Self {
        let executor = DualModeExecutor::new(strategy, &config);
        Self::assemble(SdkContext::new(config, executor, None), None)
    }

    /// Production SDK talking to a relay over a socket
    pub async fn connect(config: SdkConfig, socket: &SocketRuntimeConfig) -> Result<Self> {
        let registry = CorrelationRegistry::new();
        let runtime = Arc::new(SocketRuntime::connect(socket, registry.clone()).await?);
        let dispatcher = Dispatcher::new(runtime.clone(), registry.clone(), config.request_timeout());
        let executor = DualModeExecutor::production(dispatcher, &config);
        Ok(Self::assemble(
            SdkContext::new(config, executor, Some(registry)),
            Some(runtime),
        ))
    }

    /// SDK for `config.mode`; production mode needs a socket relay
    pub async fn from_config(
        config: SdkConfig,
        socket: Option<&SocketRuntimeConfig>,
    ) -> Result<Self> {
        match (config.mode, socket) {
            (ExecutionMode::Development, _) => Ok(Self::development(config)),
            (ExecutionMode::Production, Some(socket)) => Self::connect(config, socket).await,
            (ExecutionMode::Production, None) => Err(BridgeError::RuntimeUnavailable(
                "production mode requires a runtime connection".into(),
            )),
        }
    }

    /// Handshake using the configured API key and game id
    pub async fn initialize(&self) -> bool {
        let config = self.ctx.config();
        self.initialize_with(&config.api_key, config.game_id.as_deref())
            .await
    }

    pub async fn initialize_with(&self, api_key: &str, game_id: Option<&str>) -> bool {
        self.ctx.gate().initialize(api_key, game_id).await
    }

    pub fn state(&self) -> InitializationState {
        self.ctx.gate().state()
    }

    pub fn is_ready(&self) -> bool {
        self.ctx.gate().is_ready()
    }

    pub fn gate(&self) -> &InitializationGate {
        self.ctx.gate()
    }

    pub fn mode(&self) -> ExecutionMode {
        self.ctx.executor().mode()
    }

    pub fn context(&self) -> &Arc<SdkContext> {
        &self.ctx
    }

    /// Requests still waiting on the runtime (always 0 in development)
    pub fn pending_requests(&self) -> usize {
        self.ctx.registry().map_or(0, CorrelationRegistry::len)
    }

    /// Abandon every in-flight call with `Cancelled` and refuse new ones
    pub fn shutdown(&self) {
        info!("Shutting down Solis Games SDK");
        self.ctx.shutdown_token().cancel();
        if let Some(registry) = self.ctx.registry() {
            registry.fail_all(BridgeError::Cancelled);
        }
        if let Some(runtime) = &self.runtime {
            runtime.shutdown();
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn leaderboards(&self) -> &Leaderboards {
        &self.leaderboards
    }

    pub fn achievements(&self) -> &Achievements {
        &self.achievements
    }

    pub fn tournaments(&self) -> &Tournaments {
        &self.tournaments
    }

    pub fn cloud_save(&self) -> &CloudSave {
        &self.cloud_save
    }

    pub fn ads(&self) -> &Ads {
        &self.ads
    }

    pub fn analytics(&self) -> &Analytics {
        &self.analytics
    }

    pub fn friends(&self) -> &Friends {
        &self.friends
    }

    pub fn chat(&self) -> &Chat {
        &self.chat
    }
}

impl Drop for SolisSdk {
    fn drop(&mut self) {
        self.ctx.shutdown_token().cancel();
    }
}
