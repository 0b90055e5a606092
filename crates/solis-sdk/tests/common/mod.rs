//! Helpers shared by the facade test suites

use serde_json::{Value, json};
use solis_core::{BridgeError, Presence};
use solis_sdk::SolisSdk;
use std::collections::HashMap;

/// Call every facade method once with valid arguments, keeping only the outcome
pub async fn call_every_facade(sdk: &SolisSdk) -> Vec<(&'static str, Result<(), BridgeError>)> {
    let mut metadata = HashMap::new();
    metadata.insert("character".to_string(), json!("knight"));
    let presence = Presence {
        status: "online".into(),
        activity: Some("lobby".into()),
        joinable: true,
    };

    vec![
        ("getUser", sdk.user().get_user().await.map(drop)),
        ("showRewardedAd", sdk.ads().show_rewarded().await.map(drop)),
        ("showInterstitialAd", sdk.ads().show_interstitial().await.map(drop)),
        ("trackEvent", sdk.analytics().track_event("level_start").await.map(drop)),
        (
            "trackEvent+properties",
            sdk.analytics()
                .track_event_with("level_end", &json!({"level": 3}))
                .await
                .map(drop),
        ),
        ("cloudSaveSave", sdk.cloud_save().save("slot1", &json!({"level": 5})).await.map(drop)),
        ("cloudSaveLoad", sdk.cloud_save().load::<Value>("slot1").await.map(drop)),
        ("cloudSaveLoad record", sdk.cloud_save().load_record("slot1").await.map(drop)),
        ("cloudSaveExists", sdk.cloud_save().exists("slot1").await.map(drop)),
        ("cloudSaveDelete", sdk.cloud_save().delete("slot1").await.map(drop)),
        (
            "leaderboardSubmit",
            sdk.leaderboards().submit_score("high_scores", 10).await.map(drop),
        ),
        (
            "leaderboardSubmit+metadata",
            sdk.leaderboards()
                .submit_score_with_metadata("high_scores", 10, Some(&metadata))
                .await
                .map(drop),
        ),
        ("leaderboardGet", sdk.leaderboards().get_scores("high_scores", 10, 0).await.map(drop)),
        ("leaderboardGetNearby", sdk.leaderboards().get_nearby("high_scores", 3).await.map(drop)),
        ("tournamentJoin", sdk.tournaments().join("spring-cup").await.map(drop)),
        ("tournamentList", sdk.tournaments().list().await.map(drop)),
        ("tournamentGetBracket", sdk.tournaments().get_bracket("spring-cup").await.map(drop)),
        ("achievementUnlock", sdk.achievements().unlock("first_win").await.map(drop)),
        (
            "achievementUpdateProgress",
            sdk.achievements().update_progress("collector", 40.0).await.map(drop),
        ),
        ("achievementList", sdk.achievements().list().await.map(drop)),
        ("friendsList", sdk.friends().list().await.map(drop)),
        ("friendsAdd", sdk.friends().add("user-2").await.map(drop)),
        ("friendsRemove", sdk.friends().remove("user-2").await.map(drop)),
        ("friendsGetOnline", sdk.friends().get_online().await.map(drop)),
        ("friendsUpdatePresence", sdk.friends().update_presence(&presence).await.map(drop)),
        ("chatSend", sdk.chat().send("general", "hi").await.map(drop)),
        ("chatGetHistory", sdk.chat().get_history("general", 20).await.map(drop)),
    ]
}
