//! Transport abstractions for socket-hosted runtimes
//!
//! Provides AsyncReader/AsyncWriter traits that can be implemented
//! for different transport mechanisms, plus the background tasks that move
//! frames between the transport and the correlation registry.

use crate::protocol::{BridgeReply, HostFrame, RuntimeFrame, deserialize, serialize};
use crate::registry::CorrelationRegistry;
use crate::tcp::MAX_FRAME_LEN;
use async_trait::async_trait;
use parking_lot::RwLock;
use solis_core::{BridgeError, Result};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

/// Trait for async reading from a transport
#[async_trait]
pub trait AsyncReader: Send {
    /// Read a complete message from the transport
    /// Messages are length-prefixed: 4-byte little-endian length + JSON payload
    async fn read_message(&mut self) -> Result<Vec<u8>>;
}

/// Trait for async writing to a transport
#[async_trait]
pub trait AsyncWriter: Send + Sync {
    /// Write a complete message to the transport
    /// Messages are length-prefixed: 4-byte little-endian length + JSON payload
    async fn write_message(&mut self, data: &[u8]) -> Result<()>;
}

/// What the runtime announced in its Hello frame
#[derive(Debug, Clone, Default)]
pub struct RuntimeInfo {
    pub namespaces: HashSet<String>,
    pub version: Option<String>,
}

/// Connection state shared between the runtime handle and its tasks
pub struct Session {
    connected: AtomicBool,
    info: RwLock<Option<RuntimeInfo>>,
    hello_tx: watch::Sender<bool>,
}

impl Session {
    pub fn new() -> Arc<Self> {
        let (hello_tx, _) = watch::channel(false);
        Arc::new(Self {
            connected: AtomicBool::new(true),
            info: RwLock::new(None),
            hello_tx,
        })
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Whether `SolisGames.SDK.<namespace>` was announced
    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.is_connected()
            && self
                .info
                .read()
                .as_ref()
                .is_some_and(|info| info.namespaces.contains(namespace))
    }

    pub fn info(&self) -> Option<RuntimeInfo> {
        self.info.read().clone()
    }

    /// Receiver that flips to true once Hello arrives
    pub fn hello_received(&self) -> watch::Receiver<bool> {
        self.hello_tx.subscribe()
    }

    fn announce(&self, info: RuntimeInfo) {
        info!(
            "Runtime ready: version={:?} namespaces={:?}",
            info.version, info.namespaces
        );
        *self.info.write() = Some(info);
        self.hello_tx.send_replace(true);
    }

    pub(crate) fn mark_disconnected(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }
}

/// Background reader task that handles incoming frames
///
/// This task:
/// - Records the namespaces announced by Hello
/// - Routes token-style replies and rejections to the registry by token
/// - Routes push replies to the registry by receiver/method
/// - Fails every pending request when the connection drops
pub async fn reader_task<R: AsyncReader>(
    mut reader: R,
    registry: CorrelationRegistry,
    session: Arc<Session>,
) {
    loop {
        let data = match reader.read_message().await {
            Ok(data) => data,
            Err(e) => {
                error!("Reader task failed: {}", e);
                session.mark_disconnected();
                registry.fail_all(BridgeError::Transport("Connection lost".into()));
                break;
            }
        };

        let json_preview: String = String::from_utf8_lossy(&data).chars().take(200).collect();
        debug!("[Runtime→Host] len={} json={}", data.len(), json_preview);

        match deserialize(&data) {
            Ok(RuntimeFrame::Hello {
                namespaces,
                version,
            }) => session.announce(RuntimeInfo {
                namespaces: namespaces.into_iter().collect(),
                version,
            }),
            Ok(RuntimeFrame::Reply { token, reply }) => {
                registry.resolve(token, reply);
            }
            Ok(RuntimeFrame::Rejected { token, reason }) => {
                registry.resolve(token, BridgeReply::Rejected(reason));
            }
            Ok(RuntimeFrame::Push {
                receiver,
                method,
                payload,
            }) => {
                registry.resolve_by_target(&receiver, &method, BridgeReply::Payload(payload));
            }
            Err(e) => {
                // Without a token there is nobody to hand the failure to
                warn!("Failed to deserialize frame: {}", e);
            }
        }
    }
}

/// Background writer task draining outbound frames onto the transport
pub async fn writer_task<W: AsyncWriter>(
    mut writer: W,
    mut outbound_rx: mpsc::UnboundedReceiver<HostFrame>,
    registry: CorrelationRegistry,
    session: Arc<Session>,
) {
    while let Some(frame) = outbound_rx.recv().await {
        let shutting_down = matches!(frame, HostFrame::Shutdown);
        let encoded = serialize(&frame)
            .map_err(|e| format!("Failed to serialize frame: {}", e))
            .and_then(|data| {
                if data.len() > MAX_FRAME_LEN {
                    Err(format!("Frame too large: {} bytes", data.len()))
                } else {
                    Ok(data)
                }
            });
        let data = match encoded {
            Ok(data) => data,
            Err(reason) => {
                // Only this call is lost; the connection stays up
                error!("{}", reason);
                if let Some(token) = frame.token() {
                    registry.reject(token, BridgeError::Transport(reason));
                }
                continue;
            }
        };

        let json_preview: String = String::from_utf8_lossy(&data).chars().take(200).collect();
        debug!("[Host→Runtime] len={} json={}", data.len(), json_preview);

        if let Err(e) = writer.write_message(&data).await {
            error!("Writer task failed: {}", e);
            session.mark_disconnected();
            registry.fail_all(BridgeError::Transport("Connection lost".into()));
            break;
        }
        if shutting_down {
            break;
        }
    }
    debug!("Outbound channel closed, writer task exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ReplyKind;
    use std::collections::VecDeque;

    struct ScriptedReader(VecDeque<Vec<u8>>);

    #[derive(Clone, Default)]
    struct RecordingWriter(Arc<parking_lot::Mutex<Vec<Vec<u8>>>>);

    #[async_trait]
    impl AsyncWriter for RecordingWriter {
        async fn write_message(&mut self, data: &[u8]) -> Result<()> {
            self.0.lock().push(data.to_vec());
            Ok(())
        }
    }

    #[async_trait]
    impl AsyncReader for ScriptedReader {
        async fn read_message(&mut self) -> Result<Vec<u8>> {
            self.0
                .pop_front()
                .ok_or_else(|| BridgeError::Transport("EOF".into()))
        }
    }

    #[tokio::test]
    async fn test_reader_routes_frames() {
        let registry = CorrelationRegistry::new();
        let session = Session::new();
        let flag = registry.register(ReplyKind::SuccessFlag);
        let rejected = registry.register(ReplyKind::SuccessFlag);
        let orphan = registry.register(ReplyKind::StringPayload);

        let frames = vec![
            br#"{"type":"hello","namespaces":["core","ads"]}"#.to_vec(),
            format!(
                r#"{{"type":"reply","token":{},"reply":{{"flag":1}}}}"#,
                flag.token().as_u64()
            )
            .into_bytes(),
            b"garbage".to_vec(),
            format!(
                r#"{{"type":"rejected","token":{},"reason":"no fill"}}"#,
                rejected.token().as_u64()
            )
            .into_bytes(),
        ];

        reader_task(ScriptedReader(frames.into()), registry.clone(), session.clone()).await;

        assert!(!session.is_connected());
        assert!(!session.has_namespace("core"));
        assert_eq!(flag.wait(None).await.unwrap(), BridgeReply::Flag(1));
        assert_eq!(
            rejected.wait(None).await.unwrap(),
            BridgeReply::Rejected("no fill".into())
        );
        // EOF after the script fails whatever is left
        assert!(matches!(
            orphan.wait(None).await,
            Err(BridgeError::Transport(_))
        ));
        assert!(session.info().unwrap().namespaces.contains("ads"));
    }

    #[tokio::test]
    async fn test_unsendable_call_fails_alone() {
        let registry = CorrelationRegistry::new();
        let session = Session::new();
        let writer = RecordingWriter::default();
        let (tx, rx) = mpsc::unbounded_channel();

        let oversized = registry.register(ReplyKind::SuccessFlag);
        let small = registry.register(ReplyKind::SuccessFlag);
        tx.send(HostFrame::Call {
            token: oversized.token(),
            operation: crate::protocol::Operation::CloudSaveSave,
            args: vec!["slot1".into(), "x".repeat(MAX_FRAME_LEN).into()],
            receiver: None,
            method: None,
        })
        .unwrap();
        tx.send(HostFrame::Call {
            token: small.token(),
            operation: crate::protocol::Operation::TrackEvent,
            args: vec!["app_open".into(), "".into()],
            receiver: None,
            method: None,
        })
        .unwrap();
        tx.send(HostFrame::Shutdown).unwrap();

        writer_task(writer.clone(), rx, registry.clone(), session).await;

        assert!(matches!(
            oversized.wait(None).await,
            Err(BridgeError::Transport(reason)) if reason.contains("too large")
        ));
        // The small call and the shutdown still went out
        assert_eq!(writer.0.lock().len(), 2);
        assert_eq!(registry.len(), 1);
        drop(small);
    }
}
