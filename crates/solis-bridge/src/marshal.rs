//! Marshalling between typed values and the wire form
//!
//! Structured payloads cross the boundary as JSON text, scalar success flags
//! as the integers 0 and 1. Maps and nested arrays go through `serde_json`
//! unchanged, so metadata dictionaries survive the trip.

use crate::protocol::{BridgeReply, ReplyKind};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use solis_core::{BridgeError, Result};

/// Encode a value as JSON text
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| BridgeError::InvalidArgument(format!("value is not serializable: {}", e)))
}

/// Decode JSON text into a typed value
pub fn decode<T: DeserializeOwned>(wire: &str) -> Result<T> {
    serde_json::from_str(wire).map_err(|e| BridgeError::DecodeError(e.to_string()))
}

pub fn encode_flag(success: bool) -> i32 {
    i32::from(success)
}

/// Decode a success flag; anything other than 0 or 1 is malformed
pub fn decode_flag(raw: i32) -> Result<bool> {
    match raw {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(BridgeError::DecodeError(format!(
            "success flag must be 0 or 1, got {}",
            other
        ))),
    }
}

/// Turn a raw reply into a JSON value of the expected shape.
///
/// Flags become booleans, string payloads stay strings, typed payloads are
/// parsed. Rejections are not handled here.
pub fn decode_reply(reply: BridgeReply, kind: ReplyKind) -> Result<Value> {
    match (kind, reply) {
        (ReplyKind::SuccessFlag, BridgeReply::Flag(raw)) => decode_flag(raw).map(Value::Bool),
        // Some runtimes stringify flags when pushing by name
        (ReplyKind::SuccessFlag, BridgeReply::Payload(text)) => match text.trim() {
            "1" | "true" => Ok(Value::Bool(true)),
            "0" | "false" => Ok(Value::Bool(false)),
            other => Err(BridgeError::DecodeError(format!(
                "expected success flag, got {:?}",
                other
            ))),
        },
        (ReplyKind::StringPayload, BridgeReply::Payload(text)) => Ok(Value::String(text)),
        (ReplyKind::TypedObject, BridgeReply::Payload(text)) => decode(&text),
        (kind, BridgeReply::Flag(raw)) => Err(BridgeError::DecodeError(format!(
            "expected {:?} payload, got flag {}",
            kind, raw
        ))),
        (_, BridgeReply::Rejected(reason)) => Err(BridgeError::RemoteRejected(reason)),
    }
}
