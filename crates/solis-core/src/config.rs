//! SDK configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Default window for a reply before the request is failed with a timeout
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 15_000;

/// Upper bound on any simulated mock delay
pub const MAX_MOCK_LATENCY: Duration = Duration::from_secs(30);

/// Scale a nominal delay; non-positive or non-finite scales mean no delay.
///
/// The result never exceeds `MAX_MOCK_LATENCY`.
pub fn scale_latency(nominal: Duration, scale: f64) -> Duration {
    if scale <= 0.0 || !scale.is_finite() {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(nominal.as_secs_f64() * scale)
        .map_or(MAX_MOCK_LATENCY, |scaled| scaled.min(MAX_MOCK_LATENCY))
}

/// Whether calls reach the external runtime or are answered by mocks
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Calls are dispatched to the hosted JavaScript SDK
    Production,
    /// Calls are answered locally after a simulated delay
    #[default]
    Development,
}

impl ExecutionMode {
    /// Parse `production` / `development` (also `prod` / `dev` / `editor`)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Some(ExecutionMode::Production),
            "development" | "dev" | "editor" => Some(ExecutionMode::Development),
            _ => None,
        }
    }
}

/// Feature domains that can be switched off in configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Ads,
    Analytics,
    CloudSave,
    Leaderboards,
    Tournaments,
    Achievements,
    Friends,
    Chat,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Feature::Ads => "ads",
            Feature::Analytics => "analytics",
            Feature::CloudSave => "cloud_save",
            Feature::Leaderboards => "leaderboards",
            Feature::Tournaments => "tournaments",
            Feature::Achievements => "achievements",
            Feature::Friends => "friends",
            Feature::Chat => "chat",
        };
        f.write_str(name)
    }
}

/// Per-feature enable switches
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FeatureFlags {
    pub ads: bool,
    pub analytics: bool,
    pub cloud_save: bool,
    pub leaderboards: bool,
    pub tournaments: bool,
    pub achievements: bool,
    pub friends: bool,
    pub chat: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            ads: true,
            analytics: true,
            cloud_save: true,
            leaderboards: true,
            tournaments: true,
            achievements: true,
            friends: true,
            chat: true,
        }
    }
}

impl FeatureFlags {
    pub fn is_enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::Ads => self.ads,
            Feature::Analytics => self.analytics,
            Feature::CloudSave => self.cloud_save,
            Feature::Leaderboards => self.leaderboards,
            Feature::Tournaments => self.tournaments,
            Feature::Achievements => self.achievements,
            Feature::Friends => self.friends,
            Feature::Chat => self.chat,
        }
    }

    pub fn set(&mut self, feature: Feature, enabled: bool) {
        let slot = match feature {
            Feature::Ads => &mut self.ads,
            Feature::Analytics => &mut self.analytics,
            Feature::CloudSave => &mut self.cloud_save,
            Feature::Leaderboards => &mut self.leaderboards,
            Feature::Tournaments => &mut self.tournaments,
            Feature::Achievements => &mut self.achievements,
            Feature::Friends => &mut self.friends,
            Feature::Chat => &mut self.chat,
        };
        *slot = enabled;
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Configuration for the SDK context
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SdkConfig {
    /// Opaque platform API key (required by initialize)
    pub api_key: String,
    /// Optional opaque game identifier
    pub game_id: Option<String>,
    /// Production or development execution
    pub mode: ExecutionMode,
    /// Reply window for dispatched requests
    pub request_timeout_ms: u64,
    /// Multiplier applied to every simulated mock delay
    pub mock_latency_scale: f64,
    /// Feature enable switches
    pub features: FeatureFlags,
    /// When false, feature switches are advisory only
    pub enforce_feature_flags: bool,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            game_id: None,
            mode: ExecutionMode::default(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            mock_latency_scale: 1.0,
            features: FeatureFlags::default(),
            enforce_feature_flags: true,
        }
    }
}

impl SdkConfig {
    /// Create config with the given API key and defaults for everything else
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Parse config from JSON text
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load config from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Overlay `SOLIS_*` variables from the process environment
    pub fn apply_process_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay `SOLIS_*` variables resolved through `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("SOLIS_API_KEY") {
            self.api_key = key;
        }
        if let Some(game_id) = lookup("SOLIS_GAME_ID") {
            self.game_id = if game_id.is_empty() { None } else { Some(game_id) };
        }
        if let Some(mode) = lookup("SOLIS_MODE") {
            self.mode = ExecutionMode::parse(&mode).ok_or(ConfigError::InvalidValue {
                key: "SOLIS_MODE",
                value: mode,
            })?;
        }
        if let Some(timeout) = lookup("SOLIS_REQUEST_TIMEOUT_MS") {
            self.request_timeout_ms =
                timeout
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: "SOLIS_REQUEST_TIMEOUT_MS",
                        value: timeout.clone(),
                    })?;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Whether calls for `feature` may be dispatched
    pub fn allows(&self, feature: Feature) -> bool {
        !self.enforce_feature_flags || self.features.is_enabled(feature)
    }
}
