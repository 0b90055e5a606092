//! Correlation of in-flight requests with their asynchronous replies
//!
//! Every dispatched call gets a fresh token and a oneshot channel. Replies are
//! routed back either by token or, for runtimes that can only push by name,
//! by `(receiver, method)` pair. The table is guarded by a non-async lock so
//! replies can be delivered from plain callbacks.

use crate::protocol::{BridgeReply, ReplyKind, ReplyTarget, Token};
use parking_lot::Mutex;
use solis_core::{BridgeError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// One outstanding call
struct PendingRequest {
    kind: ReplyKind,
    target: Option<ReplyTarget>,
    created_at: Instant,
    reply_tx: oneshot::Sender<Result<BridgeReply>>,
}

#[derive(Default)]
struct Table {
    last_token: u64,
    pending: HashMap<Token, PendingRequest>,
    /// Tokens waiting on each push target, oldest first
    by_target: HashMap<ReplyTarget, Vec<Token>>,
}

impl Table {
    fn take(&mut self, token: Token) -> Option<PendingRequest> {
        let request = self.pending.remove(&token)?;
        if let Some(target) = &request.target {
            if let Some(tokens) = self.by_target.get_mut(target) {
                tokens.retain(|t| *t != token);
                if tokens.is_empty() {
                    self.by_target.remove(target);
                }
            }
        }
        Some(request)
    }
}

/// Registry of in-flight requests
#[derive(Clone, Default)]
pub struct CorrelationRegistry {
    table: Arc<Mutex<Table>>,
}

impl CorrelationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token-style request
    pub fn register(&self, kind: ReplyKind) -> PendingReply {
        self.insert(kind, None)
    }

    /// Register a request that may also be answered through a push target
    pub fn register_with_target(&self, kind: ReplyKind, target: ReplyTarget) -> PendingReply {
        self.insert(kind, Some(target))
    }

    fn insert(&self, kind: ReplyKind, target: Option<ReplyTarget>) -> PendingReply {
        let (reply_tx, reply_rx) = oneshot::channel();
        let token = {
            let mut table = self.table.lock();
            table.last_token += 1;
            let token = Token(table.last_token);
            if let Some(target) = &target {
                table.by_target.entry(target.clone()).or_default().push(token);
            }
            table.pending.insert(
                token,
                PendingRequest {
                    kind,
                    target,
                    created_at: Instant::now(),
                    reply_tx,
                },
            );
            token
        };
        debug!("Registered request {} ({:?})", token, kind);

        PendingReply {
            token,
            kind,
            reply_rx,
            registry: self.clone(),
        }
    }

    /// Deliver a reply by token.
    ///
    /// Returns false when the token is unknown or already resolved; the reply
    /// is dropped.
    pub fn resolve(&self, token: Token, reply: BridgeReply) -> bool {
        self.deliver(token, Ok(reply))
    }

    /// Deliver a push-style reply to the most recent request waiting on the target
    pub fn resolve_by_target(&self, receiver: &str, method: &str, reply: BridgeReply) -> bool {
        let target = ReplyTarget::new(receiver, method);
        let token = {
            let table = self.table.lock();
            match table.by_target.get(&target) {
                Some(tokens) => {
                    if tokens.len() > 1 {
                        warn!(
                            "{} pending requests for {}, routing push to the most recent",
                            tokens.len(),
                            target
                        );
                    }
                    tokens.last().copied()
                }
                None => None,
            }
        };

        match token {
            Some(token) => self.deliver(token, Ok(reply)),
            None => {
                warn!("Push for {} but no pending request, ignoring", target);
                false
            }
        }
    }

    /// Fail a request with `error`
    pub fn reject(&self, token: Token, error: BridgeError) -> bool {
        self.deliver(token, Err(error))
    }

    /// Remove a request and wake its awaiter with `Cancelled`
    pub fn cancel(&self, token: Token) -> bool {
        self.reject(token, BridgeError::Cancelled)
    }

    /// Drop a request without notifying anyone
    pub fn forget(&self, token: Token) -> bool {
        self.table.lock().take(token).is_some()
    }

    /// Fail every outstanding request, returning how many there were
    pub fn fail_all(&self, error: BridgeError) -> usize {
        let drained: Vec<PendingRequest> = {
            let mut table = self.table.lock();
            table.by_target.clear();
            table.pending.drain().map(|(_, request)| request).collect()
        };
        let count = drained.len();
        for request in drained {
            let _ = request.reply_tx.send(Err(error.clone()));
        }
        if count > 0 {
            warn!("Failed {} pending requests: {}", count, error);
        }
        count
    }

    fn deliver(&self, token: Token, outcome: Result<BridgeReply>) -> bool {
        let request = self.table.lock().take(token);
        match request {
            Some(request) => {
                debug!(
                    "Resolved request {} ({:?}) after {:?}",
                    token,
                    request.kind,
                    request.created_at.elapsed()
                );
                if request.reply_tx.send(outcome).is_err() {
                    debug!("Awaiter for {} already gone", token);
                }
                true
            }
            None => {
                warn!("Reply for unknown or already resolved request {}, ignoring", token);
                false
            }
        }
    }

    /// Number of outstanding requests
    pub fn len(&self) -> usize {
        self.table.lock().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, token: Token) -> bool {
        self.table.lock().pending.contains_key(&token)
    }

    /// Age of the longest-waiting request
    pub fn oldest_age(&self) -> Option<Duration> {
        self.table
            .lock()
            .pending
            .values()
            .map(|request| request.created_at.elapsed())
            .max()
    }
}

/// Awaitable handle for one registered request.
///
/// Dropping the handle removes the request from the registry, so a caller
/// that goes away never leaves an orphaned entry behind.
pub struct PendingReply {
    token: Token,
    kind: ReplyKind,
    reply_rx: oneshot::Receiver<Result<BridgeReply>>,
    registry: CorrelationRegistry,
}

impl PendingReply {
    pub fn token(&self) -> Token {
        self.token
    }

    pub fn kind(&self) -> ReplyKind {
        self.kind
    }

    /// Wait for the reply, failing with `Timeout` after `timeout` if given
    pub async fn wait(mut self, timeout: Option<Duration>) -> Result<BridgeReply> {
        let received = match timeout {
            Some(limit) => match tokio::time::timeout(limit, &mut self.reply_rx).await {
                Ok(received) => received,
                Err(_) => {
                    self.registry.forget(self.token);
                    debug!("Request {} timed out after {:?}", self.token, limit);
                    return Err(BridgeError::Timeout(limit));
                }
            },
            None => (&mut self.reply_rx).await,
        };

        // Sender dropped without a reply: the entry was torn down
        received.unwrap_or(Err(BridgeError::Cancelled))
    }
}

impl std::fmt::Debug for PendingReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingReply")
            .field("token", &self.token)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl Drop for PendingReply {
    fn drop(&mut self) {
        self.registry.forget(self.token);
    }
}
