//! Shared state behind every facade

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use solis_bridge::{CorrelationRegistry, DualModeExecutor, InitializationGate, Operation};
use solis_core::{BridgeError, ModuleResult, Result, SdkConfig};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// One per SDK instance; facades hold it behind an `Arc`
pub struct SdkContext {
    config: SdkConfig,
    gate: InitializationGate,
    executor: DualModeExecutor,
    registry: Option<CorrelationRegistry>,
    shutdown: CancellationToken,
}

impl SdkContext {
    pub(crate) fn new(
        config: SdkConfig,
        executor: DualModeExecutor,
        registry: Option<CorrelationRegistry>,
    ) -> Self {
        Self {
            gate: InitializationGate::new(executor.clone()),
            config,
            executor,
            registry,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    pub fn gate(&self) -> &InitializationGate {
        &self.gate
    }

    pub fn executor(&self) -> &DualModeExecutor {
        &self.executor
    }

    /// Registry of the production dispatcher, if there is one
    pub fn registry(&self) -> Option<&CorrelationRegistry> {
        self.registry.as_ref()
    }

    pub(crate) fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }

    /// Validate arguments locally, logging a rejection against `module`
    pub(crate) fn prepare<F>(
        &self,
        module: &'static str,
        operation: Operation,
        build: F,
    ) -> Result<Vec<Value>>
    where
        F: FnOnce() -> Result<Vec<Value>>,
    {
        build().inspect_err(|e| {
            warn!(module = module, kind = e.kind(), "{} rejected: {}", operation, e);
        })
    }

    /// Gate, execute and log one facade call.
    ///
    /// Calls are abandoned with `Cancelled` once the SDK shuts down.
    pub(crate) async fn call<T, F>(
        &self,
        module: &'static str,
        operation: Operation,
        args: Vec<Value>,
        mock: F,
    ) -> ModuleResult<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let result = match self.gate.ensure_ready() {
            Ok(()) => {
                self.executor
                    .execute_cancellable(operation, args, mock, self.shutdown.child_token())
                    .await
            }
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            self.report(module, operation, e);
        }
        result
    }

    /// `call` for operations answering with a success flag.
    ///
    /// A zero flag stays `Ok(false)` but is logged as a remote failure.
    pub(crate) async fn call_flag(
        &self,
        module: &'static str,
        operation: Operation,
        args: Vec<Value>,
    ) -> ModuleResult<bool> {
        let ok = self.call(module, operation, args, || true).await?;
        if !ok {
            warn!(
                module = module,
                kind = "remote_rejected",
                "{} failed: runtime reported failure",
                operation
            );
        }
        Ok(ok)
    }

    /// Log a failure that happened after the call returned
    pub(crate) fn report(&self, module: &'static str, operation: Operation, error: &BridgeError) {
        warn!(module = module, kind = error.kind(), "{} failed: {}", operation, error);
    }
}
