//! Facades in development mode, answered by mocks

mod common;

use serde::{Deserialize, Serialize};
use solis_core::{BridgeError, Feature, Presence, SdkConfig};
use solis_sdk::SolisSdk;
use solis_bridge::InitializationState;
use std::collections::HashMap;
use std::time::Duration;

fn config() -> SdkConfig {
    SdkConfig {
        mock_latency_scale: 0.0,
        ..SdkConfig::with_api_key("pk_test")
    }
}

async fn ready_sdk() -> SolisSdk {
    let sdk = SolisSdk::development(config());
    assert!(sdk.initialize().await);
    sdk
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct Progress {
    level: u32,
}

#[tokio::test]
async fn test_calls_before_initialize_fail() {
    let sdk = SolisSdk::development(config());
    assert_eq!(sdk.state(), InitializationState::Uninitialized);

    for (operation, outcome) in common::call_every_facade(&sdk).await {
        assert_eq!(outcome, Err(BridgeError::NotInitialized), "{}", operation);
    }
    assert_eq!(sdk.pending_requests(), 0);
    assert_eq!(sdk.state(), InitializationState::Uninitialized);
}

#[tokio::test]
async fn test_mock_calls_never_fail() {
    let sdk = ready_sdk().await;
    for (operation, outcome) in common::call_every_facade(&sdk).await {
        assert_eq!(outcome, Ok(()), "{}", operation);
    }
}

#[tokio::test]
async fn test_leaderboard_offset_past_the_end() {
    let sdk = ready_sdk().await;

    let page = sdk
        .leaderboards()
        .get_scores("high_scores", 10, u32::MAX)
        .await
        .unwrap();
    assert!(page.entries.is_empty());

    let tail = sdk
        .leaderboards()
        .get_scores("high_scores", 10, 995)
        .await
        .unwrap();
    assert_eq!(tail.entries.len(), 5);
    assert_eq!(tail.entries[0].rank, 996);
    assert!(tail.is_well_ordered());
}

#[tokio::test(start_paused = true)]
async fn test_huge_latency_scale_is_capped() {
    let sdk = SolisSdk::development(SdkConfig {
        mock_latency_scale: 1e30,
        ..SdkConfig::with_api_key("pk_test")
    });

    assert!(sdk.initialize().await);
    assert!(sdk.user().get_user().await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_initialize_retry_after_caller_gives_up() {
    let sdk = SolisSdk::development(SdkConfig {
        mock_latency_scale: 1.0,
        ..SdkConfig::with_api_key("pk_test")
    });

    let gave_up = tokio::time::timeout(Duration::from_millis(50), sdk.initialize()).await;
    assert!(gave_up.is_err());
    assert_eq!(sdk.state(), InitializationState::Uninitialized);

    assert!(sdk.initialize().await);
    assert!(sdk.is_ready());
}

#[tokio::test]
async fn test_empty_api_key_does_not_initialize() {
    let sdk = SolisSdk::development(SdkConfig::default());
    assert!(!sdk.initialize().await);
    assert_eq!(sdk.state(), InitializationState::Uninitialized);
}

#[tokio::test]
async fn test_leaderboard_submit_then_fetch() {
    let sdk = ready_sdk().await;

    let submitted = sdk
        .leaderboards()
        .submit_score("high_scores", 9500)
        .await
        .unwrap();
    assert!(submitted.rank > 0);
    assert_eq!(submitted.score, 9500);
    assert!(!submitted.flagged);

    let page = sdk
        .leaderboards()
        .get_scores("high_scores", 10, 0)
        .await
        .unwrap();
    assert!(page.entries.len() <= 10);
    assert!(page.entries.iter().all(|e| e.rank >= 1));
    assert!(page.is_well_ordered());

    let nearby = sdk
        .leaderboards()
        .get_nearby("high_scores", 3)
        .await
        .unwrap();
    assert!(nearby.is_well_ordered());
    assert!(!nearby.entries.is_empty());
}

#[tokio::test]
async fn test_invalid_arguments_rejected_locally() {
    let sdk = ready_sdk().await;

    assert!(matches!(
        sdk.leaderboards().submit_score("", 10).await,
        Err(BridgeError::InvalidArgument(_))
    ));
    assert!(matches!(
        sdk.leaderboards().get_scores("high_scores", 0, 0).await,
        Err(BridgeError::InvalidArgument(_))
    ));
    assert!(matches!(
        sdk.achievements().update_progress("collector", f64::NAN).await,
        Err(BridgeError::InvalidArgument(_))
    ));
    assert!(matches!(
        sdk.friends().update_presence(&Presence::default()).await,
        Err(BridgeError::InvalidArgument(_))
    ));
    assert!(matches!(
        sdk.cloud_save().save("", &Progress { level: 1 }).await,
        Err(BridgeError::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn test_cloud_save_mock_returns_default() {
    let sdk = ready_sdk().await;

    assert_eq!(
        sdk.cloud_save().save("slot1", &Progress { level: 5 }).await,
        Ok(true)
    );
    // Mock load never echoes what was saved
    let loaded: Progress = sdk.cloud_save().load("slot1").await.unwrap();
    assert_eq!(loaded, Progress::default());
    assert_eq!(sdk.cloud_save().exists("slot1").await, Ok(false));
    assert!(sdk.cloud_save().load_record("slot1").await.unwrap().value.is_null());
    assert_eq!(sdk.cloud_save().delete("slot1").await, Ok(true));
}

#[tokio::test]
async fn test_every_facade_answers() {
    let sdk = ready_sdk().await;

    let user = sdk.user().get_user().await.unwrap();
    assert!(!user.id.is_empty());

    assert_eq!(sdk.ads().show_rewarded().await, Ok(true));
    assert_eq!(sdk.ads().show_interstitial().await, Ok(true));

    let mut properties = HashMap::new();
    properties.insert("level", 3);
    assert_eq!(
        sdk.analytics().track_event_with("level_complete", &properties).await,
        Ok(true)
    );
    assert_eq!(sdk.analytics().track_event("app_open").await, Ok(true));

    let unlocked = sdk.achievements().unlock("first_win").await.unwrap();
    assert!(unlocked.unlocked);
    assert_eq!(unlocked.achievement_id, "first_win");
    let progress = sdk
        .achievements()
        .update_progress("collector", 100.0)
        .await
        .unwrap();
    assert!(progress.unlocked);
    assert!(!sdk.achievements().list().await.unwrap().is_empty());

    assert_eq!(sdk.tournaments().join("weekly_cup").await, Ok(true));
    assert!(!sdk.tournaments().list().await.unwrap().is_empty());
    let bracket = sdk.tournaments().get_bracket("weekly_cup").await.unwrap();
    assert_eq!(bracket.tournament_id, "weekly_cup");

    assert!(sdk.friends().list().await.unwrap().len() >= sdk.friends().get_online().await.unwrap().len());
    assert_eq!(sdk.friends().add("user_9").await, Ok(true));
    assert_eq!(sdk.friends().remove("user_9").await, Ok(true));
    let presence = Presence {
        status: "in_game".into(),
        activity: Some("Boss fight".into()),
        joinable: false,
    };
    assert_eq!(sdk.friends().update_presence(&presence).await, Ok(true));

    let message = sdk.chat().send("general", "gg").await.unwrap();
    assert_eq!(message.channel, "general");
    assert_eq!(message.text, "gg");
    let history = sdk.chat().get_history("general", 3).await.unwrap();
    assert_eq!(history.len(), 3);
    assert!(history.windows(2).all(|w| w[0].sent_at <= w[1].sent_at));
}

#[tokio::test]
async fn test_disabled_feature_short_circuits() {
    let mut config = config();
    config.features.set(Feature::Chat, false);
    let sdk = SolisSdk::development(config);
    assert!(sdk.initialize().await);

    assert_eq!(
        sdk.chat().send("general", "hi").await,
        Err(BridgeError::FeatureDisabled(Feature::Chat))
    );
    // Other domains unaffected
    assert!(sdk.user().get_user().await.is_ok());
}

#[tokio::test]
async fn test_shutdown_cancels_calls() {
    let sdk = ready_sdk().await;
    sdk.shutdown();

    assert_eq!(
        sdk.tournaments().join("weekly_cup").await,
        Err(BridgeError::Cancelled)
    );
}
