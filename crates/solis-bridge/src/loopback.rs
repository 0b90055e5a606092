//! In-process scripted runtime
//!
//! Stands in for the hosted SDK in tests: each operation is answered by a
//! handler closure, on a separate task so the reply arrives from a different
//! call stack than the dispatch, as it does in a browser.

use crate::protocol::{BridgeReply, Operation, ReplyKind};
use crate::registry::CorrelationRegistry;
use crate::runtime::{BridgeCall, ExternalRuntime};
use parking_lot::Mutex;
use serde_json::Value;
use solis_core::Result;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

type Handler = Arc<dyn Fn(&[Value]) -> BridgeReply + Send + Sync>;

/// How payload replies travel back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routing {
    /// Resolve by token
    Token,
    /// Resolve payload replies by receiver/method name, flags by token
    Push,
}

/// Scripted `ExternalRuntime`
pub struct LoopbackRuntime {
    registry: CorrelationRegistry,
    handlers: Mutex<HashMap<Operation, Handler>>,
    missing_namespaces: Mutex<HashSet<&'static str>>,
    routing: Routing,
    calls: Mutex<Vec<BridgeCall>>,
}

impl LoopbackRuntime {
    pub fn new(registry: CorrelationRegistry) -> Arc<Self> {
        Self::with_routing(registry, Routing::Token)
    }

    pub fn with_routing(registry: CorrelationRegistry, routing: Routing) -> Arc<Self> {
        let runtime = Arc::new(Self {
            registry,
            handlers: Mutex::new(HashMap::new()),
            missing_namespaces: Mutex::new(HashSet::new()),
            routing,
            calls: Mutex::new(Vec::new()),
        });
        runtime.on(Operation::Init, |_| BridgeReply::Flag(1));
        runtime
    }

    /// Answer `operation` with `handler`; unanswered operations never reply
    pub fn on<F>(&self, operation: Operation, handler: F)
    where
        F: Fn(&[Value]) -> BridgeReply + Send + Sync + 'static,
    {
        self.handlers.lock().insert(operation, Arc::new(handler));
    }

    /// Answer `operation` with a JSON payload
    pub fn on_json(&self, operation: Operation, payload: Value) {
        let text = payload.to_string();
        self.on(operation, move |_| BridgeReply::Payload(text.clone()));
    }

    /// Pretend `SolisGames.SDK.<namespace>` was never loaded
    pub fn unload(&self, namespace: &'static str) {
        self.missing_namespaces.lock().insert(namespace);
    }

    pub fn calls(&self) -> Vec<BridgeCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl ExternalRuntime for LoopbackRuntime {
    fn name(&self) -> &str {
        "loopback"
    }

    fn is_available(&self, operation: Operation) -> bool {
        !self.missing_namespaces.lock().contains(operation.namespace())
    }

    fn call(&self, call: BridgeCall) -> Result<()> {
        let handler = self.handlers.lock().get(&call.operation).cloned();
        self.calls.lock().push(call.clone());

        let Some(handler) = handler else {
            return Ok(());
        };
        let registry = self.registry.clone();
        let push = self.routing == Routing::Push
            && call.operation.reply_kind() != ReplyKind::SuccessFlag;

        tokio::spawn(async move {
            let reply = handler(&call.args);
            match (push, call.target, reply) {
                (true, Some(target), BridgeReply::Payload(payload)) => {
                    registry.resolve_by_target(
                        &target.receiver,
                        &target.method,
                        BridgeReply::Payload(payload),
                    );
                }
                (_, _, reply) => {
                    registry.resolve(call.token, reply);
                }
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::Dispatcher;
    use std::time::Duration;

    #[tokio::test]
    async fn test_push_routing_reaches_caller() {
        let registry = CorrelationRegistry::new();
        let runtime = LoopbackRuntime::with_routing(registry.clone(), Routing::Push);
        runtime.on_json(Operation::GetUser, serde_json::json!({"id": "u1"}));
        let dispatcher = Dispatcher::new(runtime.clone(), registry, Duration::from_secs(1));

        let value = dispatcher.invoke(Operation::GetUser, vec![]).await.unwrap();
        assert_eq!(value["id"], "u1");
        assert_eq!(runtime.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unloaded_namespace() {
        let registry = CorrelationRegistry::new();
        let runtime = LoopbackRuntime::new(registry.clone());
        runtime.unload("chat");
        assert!(!runtime.is_available(Operation::ChatSend));
        assert!(runtime.is_available(Operation::FriendsList));
    }
}
