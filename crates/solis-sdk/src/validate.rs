//! Local argument checks run before any dispatch

use serde::Serialize;
use solis_bridge::marshal;
use solis_core::{BridgeError, Result};

/// Non-blank string argument
pub(crate) fn required(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BridgeError::InvalidArgument(format!("{} is required", name)));
    }
    Ok(())
}

/// Count or page size that must be at least one
pub(crate) fn positive(name: &str, value: u32) -> Result<()> {
    if value == 0 {
        return Err(BridgeError::InvalidArgument(format!(
            "{} must be greater than zero",
            name
        )));
    }
    Ok(())
}

pub(crate) fn finite_non_negative(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(BridgeError::InvalidArgument(format!(
            "{} must be a non-negative number, got {}",
            name, value
        )));
    }
    Ok(())
}

/// JSON text for an optional map-like argument, `{}` when absent
pub(crate) fn json_or_empty<T: Serialize + ?Sized>(value: Option<&T>) -> Result<String> {
    match value {
        Some(value) => marshal::encode(value),
        None => Ok("{}".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_blank_strings_rejected() {
        assert!(required("leaderboardId", "high_scores").is_ok());
        assert!(matches!(
            required("leaderboardId", "  "),
            Err(BridgeError::InvalidArgument(msg)) if msg == "leaderboardId is required"
        ));
    }

    #[test]
    fn test_numbers() {
        assert!(positive("limit", 0).is_err());
        assert!(positive("limit", 1).is_ok());
        assert!(finite_non_negative("progress", f64::NAN).is_err());
        assert!(finite_non_negative("progress", -1.0).is_err());
        assert!(finite_non_negative("progress", 0.0).is_ok());
    }

    #[test]
    fn test_metadata_json() {
        let none: Option<&HashMap<String, i32>> = None;
        assert_eq!(json_or_empty(none).unwrap(), "{}");

        let mut metadata = HashMap::new();
        metadata.insert("level".to_string(), 5);
        assert_eq!(json_or_empty(Some(&metadata)).unwrap(), r#"{"level":5}"#);
    }
}
