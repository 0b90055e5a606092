//! Initialization gate
//!
//! Process-wide readiness owned by the SDK context. Facades read it before every
//! dispatch; only `initialize` writes it.

use crate::executor::DualModeExecutor;
use crate::protocol::Operation;
use serde_json::Value;
use solis_core::{BridgeError, Result};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Lifecycle of the handshake with the external runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializationState {
    Uninitialized,
    Initializing,
    Ready,
}

/// Owns the one-time `init` handshake
pub struct InitializationGate {
    state: watch::Sender<InitializationState>,
    executor: DualModeExecutor,
}

impl InitializationGate {
    pub fn new(executor: DualModeExecutor) -> Self {
        let (state, _) = watch::channel(InitializationState::Uninitialized);
        Self { state, executor }
    }

    pub fn state(&self) -> InitializationState {
        *self.state.borrow()
    }

    pub fn is_ready(&self) -> bool {
        self.state() == InitializationState::Ready
    }

    /// `Err(NotInitialized)` unless the handshake has completed
    pub fn ensure_ready(&self) -> Result<()> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(BridgeError::NotInitialized)
        }
    }

    /// Receiver observing every state change
    pub fn subscribe(&self) -> watch::Receiver<InitializationState> {
        self.state.subscribe()
    }

    /// Wait until Ready, failing with `Timeout` after `timeout`
    pub async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let mut state = self.subscribe();
        tokio::time::timeout(
            timeout,
            state.wait_for(|s| *s == InitializationState::Ready),
        )
        .await
        .map_err(|_| BridgeError::Timeout(timeout))?
        .map_err(|_| BridgeError::Cancelled)?;
        Ok(())
    }

    /// Perform the handshake.
    ///
    /// Failures are reported through the return value and the log, never raised.
    pub async fn initialize(&self, api_key: &str, game_id: Option<&str>) -> bool {
        if api_key.trim().is_empty() {
            error!("Initialization failed: API key is required");
            return false;
        }

        let mut previous = InitializationState::Uninitialized;
        let claimed = self.state.send_if_modified(|state| {
            previous = *state;
            if *state == InitializationState::Uninitialized {
                *state = InitializationState::Initializing;
                true
            } else {
                false
            }
        });
        if !claimed {
            return match previous {
                InitializationState::Ready => {
                    warn!("SDK already initialized");
                    true
                }
                _ => {
                    warn!("Initialization already in progress");
                    false
                }
            };
        }

        let handshake = Handshake {
            state: &self.state,
            settled: false,
        };
        info!("Initializing Solis Games SDK ({:?} mode)", self.executor.mode());
        let args = vec![
            Value::from(api_key),
            Value::from(game_id.unwrap_or_default()),
        ];
        let outcome = self
            .executor
            .execute(Operation::Init, args, || true)
            .await;

        match outcome {
            Ok(true) => {
                handshake.settle(InitializationState::Ready);
                info!("Solis Games SDK initialized");
                true
            }
            Ok(false) => {
                handshake.settle(InitializationState::Uninitialized);
                error!("Initialization failed: runtime reported failure");
                false
            }
            Err(e) => {
                handshake.settle(InitializationState::Uninitialized);
                error!(kind = e.kind(), "Initialization failed: {}", e);
                false
            }
        }
    }
}

/// Claimed `Initializing` state; reverts to `Uninitialized` if the
/// `initialize` future is dropped before the handshake settles
struct Handshake<'a> {
    state: &'a watch::Sender<InitializationState>,
    settled: bool,
}

impl Handshake<'_> {
    fn settle(mut self, outcome: InitializationState) {
        self.settled = true;
        self.state.send_replace(outcome);
    }
}

impl Drop for Handshake<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("Initialization abandoned before the runtime answered");
            self.state.send_replace(InitializationState::Uninitialized);
        }
    }
}
