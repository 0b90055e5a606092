//! Dual-mode execution: real dispatch or simulated replies
//!
//! The strategy is chosen once when the SDK context is built. Facade code is
//! identical in both modes; it always supplies a request and a mock.

use crate::dispatcher::Dispatcher;
use crate::protocol::Operation;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use solis_core::config::scale_latency;
use solis_core::{BridgeError, ExecutionMode, Result, SdkConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Operation plus positional arguments
#[derive(Debug, Clone)]
pub struct BridgeRequest {
    pub operation: Operation,
    pub args: Vec<Value>,
}

/// Simulated answer used in development mode
pub struct MockPlan {
    /// Nominal delay before the answer is produced
    pub latency: Duration,
    synthesize: Box<dyn FnOnce() -> Result<Value> + Send>,
}

impl MockPlan {
    pub fn new<F>(latency: Duration, synthesize: F) -> Self
    where
        F: FnOnce() -> Result<Value> + Send + 'static,
    {
        Self {
            latency,
            synthesize: Box::new(synthesize),
        }
    }

    pub fn produce(self) -> Result<Value> {
        (self.synthesize)()
    }
}

/// Policy deciding how a request is answered
#[async_trait]
pub trait ExecutionStrategy: Send + Sync {
    fn mode(&self) -> ExecutionMode;

    async fn run(
        &self,
        request: BridgeRequest,
        mock: MockPlan,
        cancel: Option<CancellationToken>,
    ) -> Result<Value>;
}

/// Routes every request through the dispatcher; mocks are ignored
pub struct ProductionStrategy {
    dispatcher: Dispatcher,
}

impl ProductionStrategy {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

#[async_trait]
impl ExecutionStrategy for ProductionStrategy {
    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Production
    }

    async fn run(
        &self,
        request: BridgeRequest,
        _mock: MockPlan,
        cancel: Option<CancellationToken>,
    ) -> Result<Value> {
        match cancel {
            Some(cancel) => {
                self.dispatcher
                    .invoke_cancellable(request.operation, request.args, &cancel)
                    .await
            }
            None => self.dispatcher.invoke(request.operation, request.args).await,
        }
    }
}

/// Answers every request locally after the mock's simulated delay.
///
/// Mock results carry no guarantee about platform behavior and are not
/// consistent across calls.
pub struct MockStrategy {
    latency_scale: f64,
}

impl MockStrategy {
    pub fn new(latency_scale: f64) -> Self {
        Self { latency_scale }
    }

    fn delay_for(&self, nominal: Duration) -> Duration {
        scale_latency(nominal, self.latency_scale)
    }
}

#[async_trait]
impl ExecutionStrategy for MockStrategy {
    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Development
    }

    async fn run(
        &self,
        request: BridgeRequest,
        mock: MockPlan,
        cancel: Option<CancellationToken>,
    ) -> Result<Value> {
        let delay = self.delay_for(mock.latency);
        debug!("[Mock] {} answering after {:?}", request.operation, delay);

        match cancel {
            Some(cancel) => tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(BridgeError::Cancelled),
                _ = tokio::time::sleep(delay) => mock.produce(),
            },
            None => {
                tokio::time::sleep(delay).await;
                mock.produce()
            }
        }
    }
}

/// Entry point used by the module facades
#[derive(Clone)]
pub struct DualModeExecutor {
    strategy: Arc<dyn ExecutionStrategy>,
    config: Arc<SdkConfig>,
}

impl DualModeExecutor {
    pub fn new(strategy: Arc<dyn ExecutionStrategy>, config: &SdkConfig) -> Self {
        Self {
            strategy,
            config: Arc::new(config.clone()),
        }
    }

    /// Executor answering from mocks, scaled by `config.mock_latency_scale`
    pub fn development(config: &SdkConfig) -> Self {
        Self::new(Arc::new(MockStrategy::new(config.mock_latency_scale)), config)
    }

    /// Executor dispatching through `dispatcher`
    pub fn production(dispatcher: Dispatcher, config: &SdkConfig) -> Self {
        Self::new(Arc::new(ProductionStrategy::new(dispatcher)), config)
    }

    pub fn mode(&self) -> ExecutionMode {
        self.strategy.mode()
    }

    /// Run `operation`, answering with `mock()` in development mode
    pub async fn execute<T, F>(&self, operation: Operation, args: Vec<Value>, mock: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        self.execute_with(operation, args, mock, None).await
    }

    /// Like `execute`, abandoning the call with `Cancelled` when `cancel` fires
    pub async fn execute_cancellable<T, F>(
        &self,
        operation: Operation,
        args: Vec<Value>,
        mock: F,
        cancel: CancellationToken,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        self.execute_with(operation, args, mock, Some(cancel)).await
    }

    async fn execute_with<T, F>(
        &self,
        operation: Operation,
        args: Vec<Value>,
        mock: F,
        cancel: Option<CancellationToken>,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        if let Some(feature) = operation.feature() {
            if !self.config.allows(feature) {
                return Err(BridgeError::FeatureDisabled(feature));
            }
        }

        let plan = MockPlan::new(operation.nominal_latency(), move || {
            Ok(serde_json::to_value(mock())?)
        });
        let value = self
            .strategy
            .run(BridgeRequest { operation, args }, plan, cancel)
            .await?;

        serde_json::from_value(value)
            .map_err(|e| BridgeError::DecodeError(format!("{}: {}", operation, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::BridgeReply;
    use crate::registry::CorrelationRegistry;
    use crate::runtime::{BridgeCall, ExternalRuntime};
    use solis_core::Feature;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast_config() -> SdkConfig {
        SdkConfig {
            mock_latency_scale: 0.0,
            ..SdkConfig::with_api_key("test")
        }
    }

    /// Runtime that answers every flag call with success
    struct FlagRuntime {
        registry: CorrelationRegistry,
        calls: AtomicUsize,
    }

    impl ExternalRuntime for FlagRuntime {
        fn is_available(&self, _operation: Operation) -> bool {
            true
        }

        fn call(&self, call: BridgeCall) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.registry.resolve(call.token, BridgeReply::Flag(1));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_mock_path_returns_mock_value() {
        let executor = DualModeExecutor::development(&fast_config());
        assert_eq!(executor.mode(), ExecutionMode::Development);

        let rank: u32 = executor
            .execute(Operation::LeaderboardSubmit, vec![], || 42u32)
            .await
            .unwrap();
        assert_eq!(rank, 42);
    }

    #[tokio::test]
    async fn test_mock_delay_applied() {
        let config = SdkConfig {
            mock_latency_scale: 0.1,
            ..fast_config()
        };
        let executor = DualModeExecutor::development(&config);
        let started = std::time::Instant::now();
        let ok: bool = executor
            .execute(Operation::ShowRewardedAd, vec![], || true)
            .await
            .unwrap();
        assert!(ok);
        // 2 s nominal scaled by 0.1
        assert!(started.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_production_path_dispatches() {
        let config = fast_config();
        let registry = CorrelationRegistry::new();
        let runtime = Arc::new(FlagRuntime {
            registry: registry.clone(),
            calls: AtomicUsize::new(0),
        });
        let dispatcher = Dispatcher::new(runtime.clone(), registry, Duration::from_secs(1));
        let executor = DualModeExecutor::production(dispatcher, &config);

        let joined: bool = executor
            .execute::<bool, _>(Operation::TournamentJoin, vec!["spring-cup".into()], || {
                unreachable!("mock must not run in production")
            })
            .await
            .unwrap();
        assert!(joined);
        assert_eq!(runtime.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_disabled_feature_short_circuits() {
        let mut config = fast_config();
        config.features.set(Feature::Chat, false);
        let executor = DualModeExecutor::development(&config);

        let err = executor
            .execute(Operation::ChatSend, vec![], || String::new())
            .await
            .unwrap_err();
        assert_eq!(err, BridgeError::FeatureDisabled(Feature::Chat));

        config.enforce_feature_flags = false;
        let advisory = DualModeExecutor::development(&config);
        let sent: bool = advisory
            .execute(Operation::ChatSend, vec![], || true)
            .await
            .unwrap();
        assert!(sent);
    }

    /// Strategy returning a fixed value regardless of the request
    struct FixedStrategy(Value);

    #[async_trait]
    impl ExecutionStrategy for FixedStrategy {
        fn mode(&self) -> ExecutionMode {
            ExecutionMode::Production
        }

        async fn run(
            &self,
            _request: BridgeRequest,
            _mock: MockPlan,
            _cancel: Option<CancellationToken>,
        ) -> Result<Value> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_shape_mismatch_is_decode_error() {
        let executor = DualModeExecutor::new(
            Arc::new(FixedStrategy(Value::String("not a number".into()))),
            &fast_config(),
        );
        let err = executor
            .execute::<u32, _>(Operation::LeaderboardGet, vec![], || 0)
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::DecodeError(msg) if msg.starts_with("leaderboardGet")));
    }

    #[tokio::test]
    async fn test_mock_cancellation() {
        let config = SdkConfig {
            mock_latency_scale: 10.0,
            ..fast_config()
        };
        let executor = DualModeExecutor::development(&config);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = executor
            .execute_cancellable(Operation::TrackEvent, vec![], || true, cancel)
            .await
            .unwrap_err();
        assert_eq!(err, BridgeError::Cancelled);
    }
}
