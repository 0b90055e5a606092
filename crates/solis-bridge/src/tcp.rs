//! TCP transport implementation
//!
//! Used when the JavaScript SDK lives in a separate host process (a browser
//! shell or Node shim) that relays calls over a local socket.

use crate::transport::{AsyncReader, AsyncWriter};
use async_trait::async_trait;
use solis_core::{BridgeError, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

/// Largest frame accepted from the runtime
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// TCP read wrapper
pub struct TcpReadWrapper(pub OwnedReadHalf);

#[async_trait]
impl AsyncReader for TcpReadWrapper {
    async fn read_message(&mut self) -> Result<Vec<u8>> {
        // Read 4-byte length prefix (little-endian)
        let mut len_bytes = [0u8; 4];
        self.0
            .read_exact(&mut len_bytes)
            .await
            .map_err(|e| BridgeError::Transport(format!("TCP read length failed: {}", e)))?;
        let len = u32::from_le_bytes(len_bytes) as usize;

        if len > MAX_FRAME_LEN {
            return Err(BridgeError::Transport(format!(
                "Frame too large: {} bytes",
                len
            )));
        }

        let mut data = vec![0u8; len];
        self.0
            .read_exact(&mut data)
            .await
            .map_err(|e| BridgeError::Transport(format!("TCP read data failed: {}", e)))?;

        Ok(data)
    }
}

/// TCP write wrapper
pub struct TcpWriteWrapper(pub OwnedWriteHalf);

#[async_trait]
impl AsyncWriter for TcpWriteWrapper {
    async fn write_message(&mut self, data: &[u8]) -> Result<()> {
        let len = u32::try_from(data.len())
            .map_err(|_| BridgeError::Transport(format!("Frame too large: {} bytes", data.len())))?
            .to_le_bytes();
        self.0
            .write_all(&len)
            .await
            .map_err(|e| BridgeError::Transport(format!("TCP write length failed: {}", e)))?;

        self.0
            .write_all(data)
            .await
            .map_err(|e| BridgeError::Transport(format!("TCP write data failed: {}", e)))?;

        self.0
            .flush()
            .await
            .map_err(|e| BridgeError::Transport(format!("TCP flush failed: {}", e)))?;

        Ok(())
    }
}
