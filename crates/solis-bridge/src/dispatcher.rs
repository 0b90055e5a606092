//! Single chokepoint for calls into the external runtime

use crate::marshal;
use crate::protocol::{BridgeReply, Operation};
use crate::registry::{CorrelationRegistry, PendingReply};
use crate::runtime::{BridgeCall, ExternalRuntime};
use serde_json::Value;
use solis_core::{BridgeError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Issues calls into the runtime and awaits their correlated replies
#[derive(Clone)]
pub struct Dispatcher {
    runtime: Arc<dyn ExternalRuntime>,
    registry: CorrelationRegistry,
    timeout: Duration,
}

impl Dispatcher {
    /// `registry` must be the one the runtime delivers replies to
    pub fn new(
        runtime: Arc<dyn ExternalRuntime>,
        registry: CorrelationRegistry,
        timeout: Duration,
    ) -> Self {
        Self {
            runtime,
            registry,
            timeout,
        }
    }

    pub fn registry(&self) -> &CorrelationRegistry {
        &self.registry
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Register and send a call without waiting for the reply.
    ///
    /// Availability and arity are checked first; a failure here never
    /// creates a registry entry.
    pub fn dispatch(&self, operation: Operation, args: Vec<Value>) -> Result<PendingReply> {
        if !self.runtime.is_available(operation) {
            return Err(BridgeError::RuntimeUnavailable(format!(
                "SolisGames.SDK.{} is not loaded ({} via {})",
                operation.namespace(),
                operation,
                self.runtime.name()
            )));
        }
        if args.len() != operation.arity() {
            return Err(BridgeError::InvalidArgument(format!(
                "{} takes {} arguments, got {}",
                operation,
                operation.arity(),
                args.len()
            )));
        }

        let target = operation.reply_target();
        let pending = match &target {
            Some(target) => self
                .registry
                .register_with_target(operation.reply_kind(), target.clone()),
            None => self.registry.register(operation.reply_kind()),
        };

        let args_preview = preview(&args);
        debug!(
            "[Host→Runtime] {} token={} args={}",
            operation,
            pending.token(),
            args_preview
        );

        // On failure `pending` is dropped here, which removes the entry
        self.runtime.call(BridgeCall {
            token: pending.token(),
            operation,
            args,
            target,
        })?;

        Ok(pending)
    }

    /// Send a call and await its decoded reply
    pub async fn invoke(&self, operation: Operation, args: Vec<Value>) -> Result<Value> {
        let pending = self.dispatch(operation, args)?;
        let reply = pending.wait(Some(self.timeout)).await?;
        finish(operation, reply)
    }

    /// Like `invoke`, but gives up with `Cancelled` when `cancel` fires
    pub async fn invoke_cancellable(
        &self,
        operation: Operation,
        args: Vec<Value>,
        cancel: &CancellationToken,
    ) -> Result<Value> {
        if cancel.is_cancelled() {
            return Err(BridgeError::Cancelled);
        }
        let pending = self.dispatch(operation, args)?;
        let token = pending.token();

        tokio::select! {
            reply = pending.wait(Some(self.timeout)) => finish(operation, reply?),
            // The dropped wait future has already released the entry
            _ = cancel.cancelled() => {
                debug!("{} {} cancelled by caller", operation, token);
                Err(BridgeError::Cancelled)
            }
        }
    }
}

fn finish(operation: Operation, reply: BridgeReply) -> Result<Value> {
    debug!("[Runtime→Host] {} reply={:?}", operation, reply);
    match reply {
        BridgeReply::Rejected(reason) => Err(BridgeError::RemoteRejected(format!(
            "{}: {}",
            operation, reason
        ))),
        reply => marshal::decode_reply(reply, operation.reply_kind()).map_err(|e| match e {
            BridgeError::DecodeError(msg) => {
                BridgeError::DecodeError(format!("{}: {}", operation, msg))
            }
            other => other,
        }),
    }
}

fn preview(args: &[Value]) -> String {
    serde_json::to_string(args)
        .unwrap_or_default()
        .chars()
        .take(200)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{ReplyKind, Token};
    use parking_lot::Mutex;
    use std::collections::HashSet;

    /// Runtime that records calls and lets the test answer them by hand
    struct RecordingRuntime {
        namespaces: HashSet<&'static str>,
        calls: Mutex<Vec<BridgeCall>>,
    }

    impl RecordingRuntime {
        fn with(namespaces: &[&'static str]) -> Arc<Self> {
            Arc::new(Self {
                namespaces: namespaces.iter().copied().collect(),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn last_token(&self) -> Token {
            self.calls.lock().last().map(|c| c.token).unwrap()
        }
    }

    impl ExternalRuntime for RecordingRuntime {
        fn is_available(&self, operation: Operation) -> bool {
            self.namespaces.contains(operation.namespace())
        }

        fn call(&self, call: BridgeCall) -> Result<()> {
            self.calls.lock().push(call);
            Ok(())
        }
    }

    fn dispatcher(runtime: Arc<RecordingRuntime>) -> Dispatcher {
        Dispatcher::new(runtime, CorrelationRegistry::new(), Duration::from_secs(5))
    }

    #[test]
    fn test_missing_namespace_is_unavailable() {
        let runtime = RecordingRuntime::with(&["core"]);
        let dispatcher = dispatcher(runtime.clone());

        let err = dispatcher
            .dispatch(Operation::ChatGetHistory, vec!["general".into(), 20.into()])
            .unwrap_err();

        assert!(matches!(err, BridgeError::RuntimeUnavailable(_)));
        assert!(runtime.calls.lock().is_empty());
        assert!(dispatcher.registry().is_empty());
    }

    #[test]
    fn test_wrong_arity_rejected_before_registering() {
        let dispatcher = dispatcher(RecordingRuntime::with(&["leaderboards"]));
        let err = dispatcher
            .dispatch(Operation::LeaderboardSubmit, vec!["high_scores".into()])
            .unwrap_err();
        assert!(matches!(err, BridgeError::InvalidArgument(_)));
        assert!(dispatcher.registry().is_empty());
    }

    #[tokio::test]
    async fn test_invoke_decodes_reply() {
        let runtime = RecordingRuntime::with(&["leaderboards"]);
        let dispatcher = dispatcher(runtime.clone());

        let task = {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move {
                dispatcher
                    .invoke(
                        Operation::LeaderboardGetNearby,
                        vec!["high_scores".into(), 2.into()],
                    )
                    .await
            })
        };

        while runtime.calls.lock().is_empty() {
            tokio::task::yield_now().await;
        }
        let call = runtime.calls.lock()[0].clone();
        assert_eq!(call.args, vec![Value::from("high_scores"), Value::from(2)]);
        assert_eq!(
            call.target.as_ref().map(|t| t.method.as_str()),
            Some("OnLeaderboardGetNearbyResult")
        );

        dispatcher.registry().resolve(
            call.token,
            BridgeReply::Payload(r#"{"leaderboardId":"high_scores","entries":[]}"#.into()),
        );
        let value = task.await.unwrap().unwrap();
        assert_eq!(value["leaderboardId"], "high_scores");
    }

    #[tokio::test]
    async fn test_rejection_becomes_remote_rejected() {
        let runtime = RecordingRuntime::with(&["ads"]);
        let dispatcher = dispatcher(runtime.clone());
        let pending = dispatcher
            .dispatch(Operation::ShowRewardedAd, vec![])
            .unwrap();
        assert_eq!(pending.kind(), ReplyKind::SuccessFlag);

        dispatcher
            .registry()
            .resolve(runtime.last_token(), BridgeReply::Rejected("no fill".into()));
        let reply = pending.wait(None).await.unwrap();
        let err = finish(Operation::ShowRewardedAd, reply).unwrap_err();
        assert_eq!(
            err,
            BridgeError::RemoteRejected("showRewardedAd: no fill".into())
        );
    }

    #[tokio::test]
    async fn test_timeout_policy() {
        let runtime = RecordingRuntime::with(&["core"]);
        let dispatcher = Dispatcher::new(
            runtime,
            CorrelationRegistry::new(),
            Duration::from_millis(30),
        );

        let err = dispatcher.invoke(Operation::GetUser, vec![]).await.unwrap_err();
        assert_eq!(err, BridgeError::Timeout(Duration::from_millis(30)));
        assert!(dispatcher.registry().is_empty());
    }

    #[tokio::test]
    async fn test_cancellation_releases_request() {
        let runtime = RecordingRuntime::with(&["friends"]);
        let dispatcher = dispatcher(runtime.clone());
        let cancel = CancellationToken::new();

        let task = {
            let dispatcher = dispatcher.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                dispatcher
                    .invoke_cancellable(Operation::FriendsList, vec![], &cancel)
                    .await
            })
        };

        while runtime.calls.lock().is_empty() {
            tokio::task::yield_now().await;
        }
        cancel.cancel();

        assert_eq!(task.await.unwrap().unwrap_err(), BridgeError::Cancelled);
        assert!(dispatcher.registry().is_empty());
        assert!(!dispatcher
            .registry()
            .resolve(runtime.last_token(), BridgeReply::Payload("[]".into())));
    }
}
