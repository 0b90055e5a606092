//! Error types for the Solis bridge

use crate::config::Feature;
use std::time::Duration;
use thiserror::Error;

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Value or failure returned by a module facade
pub type ModuleResult<T> = Result<T>;

/// Bridge error taxonomy
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BridgeError {
    /// Facade called before the initialization handshake completed
    #[error("SDK not initialized, call initialize() first")]
    NotInitialized,

    /// Required argument missing or empty, detected before dispatch
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// External runtime object, namespace or method is missing
    #[error("External runtime unavailable: {0}")]
    RuntimeUnavailable(String),

    /// Reply payload did not match the expected shape
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// External runtime reported failure (rejected promise)
    #[error("Remote rejected: {0}")]
    RemoteRejected(String),

    /// No reply arrived within the configured window
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Request abandoned before a reply arrived
    #[error("Request cancelled")]
    Cancelled,

    /// Feature switched off in configuration
    #[error("Feature disabled: {0}")]
    FeatureDisabled(Feature),

    /// Connection to the runtime host failed or dropped
    #[error("Transport error: {0}")]
    Transport(String),
}

impl BridgeError {
    /// Stable short label used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeError::NotInitialized => "not_initialized",
            BridgeError::InvalidArgument(_) => "invalid_argument",
            BridgeError::RuntimeUnavailable(_) => "runtime_unavailable",
            BridgeError::DecodeError(_) => "decode_error",
            BridgeError::RemoteRejected(_) => "remote_rejected",
            BridgeError::Timeout(_) => "timeout",
            BridgeError::Cancelled => "cancelled",
            BridgeError::FeatureDisabled(_) => "feature_disabled",
            BridgeError::Transport(_) => "transport",
        }
    }

    /// Whether retrying the same call later could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BridgeError::Timeout(_) | BridgeError::RuntimeUnavailable(_) | BridgeError::Transport(_)
        )
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::DecodeError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_maps_to_decode() {
        let err: BridgeError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert_eq!(err.kind(), "decode_error");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_feature_disabled_message() {
        let err = BridgeError::FeatureDisabled(Feature::Chat);
        assert_eq!(err.to_string(), "Feature disabled: chat");
        assert!(BridgeError::Timeout(Duration::from_secs(1)).is_retryable());
    }
}
