//! The external runtime seam
//!
//! An `ExternalRuntime` is whatever hosts `window.SolisGames.SDK`. It accepts
//! calls synchronously and answers later by resolving the call's token in the
//! `CorrelationRegistry` it was constructed with.

use crate::protocol::{HostFrame, Operation, ReplyTarget, Token};
use solis_core::Result;

/// One call handed to the runtime
#[derive(Debug, Clone)]
pub struct BridgeCall {
    pub token: Token,
    pub operation: Operation,
    /// Positional arguments in the SDK method's fixed order
    pub args: Vec<serde_json::Value>,
    /// Name-style reply target, for payload-bearing operations
    pub target: Option<ReplyTarget>,
}

impl BridgeCall {
    /// Wire frame for this call
    pub fn into_frame(self) -> HostFrame {
        let (receiver, method) = match self.target {
            Some(target) => (Some(target.receiver), Some(target.method)),
            None => (None, None),
        };
        HostFrame::Call {
            token: self.token,
            operation: self.operation,
            args: self.args,
            receiver,
            method,
        }
    }
}

/// Trait for the hosted SDK the bridge calls into
pub trait ExternalRuntime: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str {
        "runtime"
    }

    /// Whether the SDK object and the namespace for `operation` are present.
    ///
    /// Checked before every dispatch; the script may never have loaded.
    fn is_available(&self, operation: Operation) -> bool;

    /// Hand a call to the runtime.
    ///
    /// Must return without waiting for the reply.
    fn call(&self, call: BridgeCall) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PUSH_RECEIVER;

    #[test]
    fn test_call_frame_carries_target() {
        let call = BridgeCall {
            token: Token(4),
            operation: Operation::GetUser,
            args: vec![],
            target: Operation::GetUser.reply_target(),
        };
        match call.into_frame() {
            HostFrame::Call {
                token,
                receiver,
                method,
                ..
            } => {
                assert_eq!(token, Token(4));
                assert_eq!(receiver.as_deref(), Some(PUSH_RECEIVER));
                assert_eq!(method.as_deref(), Some("OnGetUserResult"));
            }
            other => panic!("Wrong frame: {:?}", other),
        }
    }
}
