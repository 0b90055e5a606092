//! Runtime reached through a local socket relay

use crate::protocol::{HostFrame, Operation};
use crate::registry::CorrelationRegistry;
use crate::runtime::{BridgeCall, ExternalRuntime};
use crate::tcp::{TcpReadWrapper, TcpWriteWrapper};
use crate::transport::{AsyncReader, AsyncWriter, RuntimeInfo, Session, reader_task, writer_task};
use solis_core::{BridgeError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

/// Configuration for the socket relay connection
#[derive(Debug, Clone)]
pub struct SocketRuntimeConfig {
    /// Host to connect to (default: 127.0.0.1)
    pub host: String,
    /// Relay port (default: 19840)
    pub port: u16,
    /// Bound on connecting and on waiting for the Hello frame
    pub connect_timeout: Duration,
}

impl Default for SocketRuntimeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 19840,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl SocketRuntimeConfig {
    /// Parse `host:port`
    pub fn from_address(address: &str) -> Option<Self> {
        let (host, port) = address.rsplit_once(':')?;
        Some(Self {
            host: host.to_string(),
            port: port.parse().ok()?,
            ..Default::default()
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// External runtime hosted on the other end of a socket
pub struct SocketRuntime {
    outbound_tx: mpsc::UnboundedSender<HostFrame>,
    session: Arc<Session>,
    reader_handle: JoinHandle<()>,
    writer_handle: JoinHandle<()>,
}

impl SocketRuntime {
    /// Connect to the relay and wait for it to announce the SDK
    pub async fn connect(config: &SocketRuntimeConfig, registry: CorrelationRegistry) -> Result<Self> {
        let addr = config.address();
        info!("Connecting to SDK relay at {}", addr);

        let stream = tokio::time::timeout(config.connect_timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| BridgeError::Transport(format!("Connection timeout to {}", addr)))?
            .map_err(|e| BridgeError::Transport(format!("Failed to connect to {}: {}", addr, e)))?;

        stream
            .set_nodelay(true)
            .map_err(|e| BridgeError::Transport(format!("Failed to set TCP_NODELAY: {}", e)))?;

        let (read_half, write_half) = stream.into_split();
        let runtime = Self::spawn(
            TcpReadWrapper(read_half),
            TcpWriteWrapper(write_half),
            registry,
        );
        runtime.wait_hello(config.connect_timeout).await?;
        Ok(runtime)
    }

    /// Start the reader and writer tasks over an already-open transport
    pub fn spawn<R, W>(reader: R, writer: W, registry: CorrelationRegistry) -> Self
    where
        R: AsyncReader + 'static,
        W: AsyncWriter + 'static,
    {
        let session = Session::new();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

        let reader_handle = tokio::spawn(reader_task(reader, registry.clone(), session.clone()));
        let writer_handle =
            tokio::spawn(writer_task(writer, outbound_rx, registry, session.clone()));

        Self {
            outbound_tx,
            session,
            reader_handle,
            writer_handle,
        }
    }

    /// Wait until the relay has sent its Hello frame
    pub async fn wait_hello(&self, timeout: Duration) -> Result<RuntimeInfo> {
        let mut hello = self.session.hello_received();
        tokio::time::timeout(timeout, hello.wait_for(|received| *received))
            .await
            .map_err(|_| BridgeError::RuntimeUnavailable("SDK relay never announced SolisGames.SDK".into()))?
            .map_err(|_| BridgeError::Transport("Session closed before Hello".into()))?;
        self.session
            .info()
            .ok_or_else(|| BridgeError::RuntimeUnavailable("SDK relay sent no namespaces".into()))
    }

    pub fn info(&self) -> Option<RuntimeInfo> {
        self.session.info()
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    /// Tell the relay the host is leaving
    pub fn shutdown(&self) {
        let _ = self.outbound_tx.send(HostFrame::Shutdown);
    }
}

impl ExternalRuntime for SocketRuntime {
    fn name(&self) -> &str {
        "socket"
    }

    fn is_available(&self, operation: Operation) -> bool {
        self.session.has_namespace(operation.namespace())
    }

    fn call(&self, call: BridgeCall) -> Result<()> {
        if !self.session.is_connected() {
            return Err(BridgeError::Transport("Not connected".into()));
        }
        self.outbound_tx
            .send(call.into_frame())
            .map_err(|_| BridgeError::Transport("Writer task not running".into()))
    }
}

impl Drop for SocketRuntime {
    fn drop(&mut self) {
        self.reader_handle.abort();
        self.writer_handle.abort();
    }
}
