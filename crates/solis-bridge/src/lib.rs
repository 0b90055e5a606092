//! Request/reply bridge to the hosted Solis Games SDK
//!
//! This crate provides:
//! - Wire protocol: operation names, reply kinds and socket frames
//! - Marshalling between typed values and the JSON/flag wire forms
//! - Correlation registry matching asynchronous replies to their callers
//! - The `ExternalRuntime` seam plus a TCP socket runtime
//! - Call dispatcher, dual-mode executor and initialization gate

pub mod dispatcher;
pub mod executor;
pub mod gate;
#[cfg(any(test, feature = "testing"))]
pub mod loopback;
pub mod marshal;
pub mod protocol;
pub mod registry;
pub mod runtime;
pub mod socket;
pub mod tcp;
pub mod transport;

pub use dispatcher::Dispatcher;
pub use executor::{
    BridgeRequest, DualModeExecutor, ExecutionStrategy, MockPlan, MockStrategy,
    ProductionStrategy,
};
pub use gate::{InitializationGate, InitializationState};
pub use protocol::{BridgeReply, HostFrame, Operation, ReplyKind, ReplyTarget, RuntimeFrame, Token};
pub use registry::{CorrelationRegistry, PendingReply};
pub use runtime::{BridgeCall, ExternalRuntime};
pub use socket::{SocketRuntime, SocketRuntimeConfig};
pub use transport::{AsyncReader, AsyncWriter, reader_task};
