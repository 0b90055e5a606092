//! Cloud save records

use serde::{Deserialize, Serialize};

/// Caller-chosen key mapped to an arbitrary serializable value.
///
/// Nothing is persisted locally; the durable copy lives on the platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecord {
    pub key: String,
    pub value: serde_json::Value,
}

impl SaveRecord {
    pub fn new(key: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}
