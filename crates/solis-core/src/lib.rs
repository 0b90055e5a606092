//! # solis-core
//!
//! Core types for the Solis Games bridge.
//!
//! This crate provides the foundational types shared by the bridge and the SDK facades:
//! - Error taxonomy and result aliases
//! - SDK configuration and feature switches
//! - Result shapes for users, leaderboards, achievements, tournaments,
//!   friends, chat and cloud save

pub mod achievement;
pub mod chat;
pub mod cloud_save;
pub mod config;
pub mod error;
pub mod friends;
pub mod leaderboard;
pub mod tournament;
pub mod user;

pub use achievement::{Achievement, ProgressResult, UnlockResult};
pub use chat::ChatMessage;
pub use cloud_save::SaveRecord;
pub use config::{ConfigError, ExecutionMode, Feature, FeatureFlags, SdkConfig};
pub use error::{BridgeError, ModuleResult, Result};
pub use friends::{Friend, Presence};
pub use leaderboard::{LeaderboardEntry, LeaderboardPage, SubmitScoreResult};
pub use tournament::{Bracket, BracketMatch, BracketRound, Tournament, TournamentStatus};
pub use user::{UserId, UserProfile};
