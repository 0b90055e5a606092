//! Wire protocol for host <-> runtime communication
//!
//! Frames are serialized as JSON with internally-tagged enums.
//! Format: {"type": "frameType", ...fields}
//!
//! Operation names and argument orders match the methods exposed by
//! `window.SolisGames.SDK` and must not change.

use serde::{Deserialize, Serialize};
use solis_core::Feature;
use std::fmt;
use std::time::Duration;

/// Receiver name used for name-style (push) replies
pub const PUSH_RECEIVER: &str = "SolisGamesSDK";

/// Opaque correlation key, unique per call and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(pub(crate) u64);

impl Token {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Expected shape of a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReplyKind {
    /// Small integer, 1 = success, 0 = failure
    SuccessFlag,
    /// Raw string handed back unchanged
    StringPayload,
    /// JSON text decoded into a typed value
    TypedObject,
}

/// Named target for push-style replies
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReplyTarget {
    pub receiver: String,
    pub method: String,
}

impl ReplyTarget {
    pub fn new(receiver: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            receiver: receiver.into(),
            method: method.into(),
        }
    }
}

impl fmt::Display for ReplyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.receiver, self.method)
    }
}

/// Operations exposed by the external runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Init,
    GetUser,
    ShowRewardedAd,
    ShowInterstitialAd,
    TrackEvent,
    CloudSaveSave,
    CloudSaveLoad,
    CloudSaveDelete,
    LeaderboardSubmit,
    LeaderboardGet,
    LeaderboardGetNearby,
    TournamentJoin,
    TournamentList,
    TournamentGetBracket,
    AchievementUnlock,
    AchievementUpdateProgress,
    AchievementList,
    FriendsList,
    FriendsAdd,
    FriendsRemove,
    FriendsGetOnline,
    FriendsUpdatePresence,
    ChatSend,
    ChatGetHistory,
}

impl Operation {
    pub const ALL: [Operation; 24] = [
        Operation::Init,
        Operation::GetUser,
        Operation::ShowRewardedAd,
        Operation::ShowInterstitialAd,
        Operation::TrackEvent,
        Operation::CloudSaveSave,
        Operation::CloudSaveLoad,
        Operation::CloudSaveDelete,
        Operation::LeaderboardSubmit,
        Operation::LeaderboardGet,
        Operation::LeaderboardGetNearby,
        Operation::TournamentJoin,
        Operation::TournamentList,
        Operation::TournamentGetBracket,
        Operation::AchievementUnlock,
        Operation::AchievementUpdateProgress,
        Operation::AchievementList,
        Operation::FriendsList,
        Operation::FriendsAdd,
        Operation::FriendsRemove,
        Operation::FriendsGetOnline,
        Operation::FriendsUpdatePresence,
        Operation::ChatSend,
        Operation::ChatGetHistory,
    ];

    /// Wire name of the SDK method
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Init => "init",
            Operation::GetUser => "getUser",
            Operation::ShowRewardedAd => "showRewardedAd",
            Operation::ShowInterstitialAd => "showInterstitialAd",
            Operation::TrackEvent => "trackEvent",
            Operation::CloudSaveSave => "cloudSaveSave",
            Operation::CloudSaveLoad => "cloudSaveLoad",
            Operation::CloudSaveDelete => "cloudSaveDelete",
            Operation::LeaderboardSubmit => "leaderboardSubmit",
            Operation::LeaderboardGet => "leaderboardGet",
            Operation::LeaderboardGetNearby => "leaderboardGetNearby",
            Operation::TournamentJoin => "tournamentJoin",
            Operation::TournamentList => "tournamentList",
            Operation::TournamentGetBracket => "tournamentGetBracket",
            Operation::AchievementUnlock => "achievementUnlock",
            Operation::AchievementUpdateProgress => "achievementUpdateProgress",
            Operation::AchievementList => "achievementList",
            Operation::FriendsList => "friendsList",
            Operation::FriendsAdd => "friendsAdd",
            Operation::FriendsRemove => "friendsRemove",
            Operation::FriendsGetOnline => "friendsGetOnline",
            Operation::FriendsUpdatePresence => "friendsUpdatePresence",
            Operation::ChatSend => "chatSend",
            Operation::ChatGetHistory => "chatGetHistory",
        }
    }

    /// Namespace under `SolisGames.SDK` that must exist for this call
    pub fn namespace(self) -> &'static str {
        match self {
            Operation::Init | Operation::GetUser => "core",
            Operation::ShowRewardedAd | Operation::ShowInterstitialAd => "ads",
            Operation::TrackEvent => "analytics",
            Operation::CloudSaveSave | Operation::CloudSaveLoad | Operation::CloudSaveDelete => {
                "cloudSave"
            }
            Operation::LeaderboardSubmit
            | Operation::LeaderboardGet
            | Operation::LeaderboardGetNearby => "leaderboards",
            Operation::TournamentJoin
            | Operation::TournamentList
            | Operation::TournamentGetBracket => "tournaments",
            Operation::AchievementUnlock
            | Operation::AchievementUpdateProgress
            | Operation::AchievementList => "achievements",
            Operation::FriendsList
            | Operation::FriendsAdd
            | Operation::FriendsRemove
            | Operation::FriendsGetOnline
            | Operation::FriendsUpdatePresence => "friends",
            Operation::ChatSend | Operation::ChatGetHistory => "chat",
        }
    }

    /// Feature switch gating this call; `None` for calls that are always allowed
    pub fn feature(self) -> Option<Feature> {
        match self.namespace() {
            "ads" => Some(Feature::Ads),
            "analytics" => Some(Feature::Analytics),
            "cloudSave" => Some(Feature::CloudSave),
            "leaderboards" => Some(Feature::Leaderboards),
            "tournaments" => Some(Feature::Tournaments),
            "achievements" => Some(Feature::Achievements),
            "friends" => Some(Feature::Friends),
            "chat" => Some(Feature::Chat),
            _ => None,
        }
    }

    /// Number of positional arguments the SDK method takes
    pub fn arity(self) -> usize {
        match self {
            Operation::GetUser
            | Operation::ShowRewardedAd
            | Operation::ShowInterstitialAd
            | Operation::TournamentList
            | Operation::AchievementList
            | Operation::FriendsList
            | Operation::FriendsGetOnline => 0,
            Operation::CloudSaveLoad
            | Operation::CloudSaveDelete
            | Operation::TournamentJoin
            | Operation::TournamentGetBracket
            | Operation::AchievementUnlock
            | Operation::FriendsAdd
            | Operation::FriendsRemove => 1,
            Operation::Init
            | Operation::TrackEvent
            | Operation::CloudSaveSave
            | Operation::LeaderboardGetNearby
            | Operation::AchievementUpdateProgress
            | Operation::ChatSend
            | Operation::ChatGetHistory => 2,
            Operation::LeaderboardSubmit
            | Operation::LeaderboardGet
            | Operation::FriendsUpdatePresence => 3,
        }
    }

    pub fn reply_kind(self) -> ReplyKind {
        match self {
            Operation::Init
            | Operation::ShowRewardedAd
            | Operation::ShowInterstitialAd
            | Operation::TrackEvent
            | Operation::CloudSaveSave
            | Operation::CloudSaveDelete
            | Operation::TournamentJoin
            | Operation::FriendsAdd
            | Operation::FriendsRemove
            | Operation::FriendsUpdatePresence => ReplyKind::SuccessFlag,
            Operation::CloudSaveLoad => ReplyKind::StringPayload,
            _ => ReplyKind::TypedObject,
        }
    }

    /// Push target for payload replies (`SolisGamesSDK.On<Op>Result`)
    pub fn reply_target(self) -> Option<ReplyTarget> {
        if self.reply_kind() == ReplyKind::SuccessFlag {
            return None;
        }
        let name = self.as_str();
        let mut method = String::with_capacity(name.len() + 8);
        method.push_str("On");
        let mut chars = name.chars();
        if let Some(first) = chars.next() {
            method.extend(first.to_uppercase());
        }
        method.push_str(chars.as_str());
        method.push_str("Result");
        Some(ReplyTarget::new(PUSH_RECEIVER, method))
    }

    /// Typical real-world latency, used as the simulated mock delay
    pub fn nominal_latency(self) -> Duration {
        let ms = match self {
            Operation::ShowRewardedAd | Operation::ShowInterstitialAd => 2000,
            Operation::Init => 500,
            Operation::TrackEvent => 100,
            Operation::CloudSaveSave | Operation::CloudSaveLoad | Operation::CloudSaveDelete => {
                300
            }
            Operation::LeaderboardSubmit | Operation::TournamentJoin => 400,
            Operation::ChatSend | Operation::FriendsUpdatePresence => 150,
            _ => 250,
        };
        Duration::from_millis(ms)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asynchronous answer from the runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BridgeReply {
    /// Token-style integer flag
    Flag(i32),
    /// JSON-encoded (or raw string) payload
    Payload(String),
    /// The SDK promise rejected
    Rejected(String),
}

/// Frames sent from the host to the runtime
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostFrame {
    /// Invoke an SDK method
    Call {
        token: Token,
        operation: Operation,
        args: Vec<serde_json::Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        receiver: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        method: Option<String>,
    },
    /// Host is going away
    Shutdown,
}

impl HostFrame {
    /// Token awaiting the answer to this frame, if any
    pub fn token(&self) -> Option<Token> {
        match self {
            HostFrame::Call { token, .. } => Some(*token),
            HostFrame::Shutdown => None,
        }
    }
}

/// Frames sent from the runtime to the host
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RuntimeFrame {
    /// SDK script loaded; lists the namespaces present on `SolisGames.SDK`
    Hello {
        namespaces: Vec<String>,
        #[serde(default)]
        version: Option<String>,
    },
    /// Token-style reply
    Reply { token: Token, reply: BridgeReply },
    /// Name-style reply addressed to a receiver/method pair
    Push {
        receiver: String,
        method: String,
        payload: String,
    },
    /// The SDK promise for `token` rejected
    Rejected { token: Token, reason: String },
}

/// Serialize a frame to JSON bytes
pub fn serialize<T: Serialize>(frame: &T) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(frame)
}

/// Deserialize a runtime frame from JSON bytes
pub fn deserialize(bytes: &[u8]) -> Result<RuntimeFrame, serde_json::Error> {
    serde_json::from_slice(bytes)
}
