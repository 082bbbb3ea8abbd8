use crate::utils::{LocalRelay, fast_config, init_tracing, join_with_config, wait_for_view};
use peerlink_client::SessionConfig;
use peerlink_client::games::RunGame;
use peerlink_core::model::GamePhase;
use std::time::Duration;

/// The countdown has exactly one owner. A follower configured with a very
/// different round time converges onto the leader's clock as soon as the
/// first snapshot lands.
#[tokio::test]
async fn test_follower_timer_follows_leader() {
    init_tracing();

    let relay = LocalRelay::new();
    let leader_cfg = SessionConfig {
        round_time: Duration::from_secs(50),
        ..fast_config()
    };
    let follower_cfg = SessionConfig {
        round_time: Duration::from_secs(120),
        ..fast_config()
    };

    let alice = join_with_config(&relay, "run:timer", "alice", RunGame, leader_cfg)
        .await
        .expect("alice failed to join");
    let bob = join_with_config(&relay, "run:timer", "bob", RunGame, follower_cfg)
        .await
        .expect("bob failed to join");

    assert!(wait_for_view(&alice, |v| v.is_ready && v.is_leader).await);
    alice.start().await.expect("start command");

    assert!(wait_for_view(&bob, |v| v.phase == GamePhase::Active).await);
    assert!(
        wait_for_view(&bob, |v| v.time_left <= 50.0).await,
        "follower adopts the leader's countdown wholesale"
    );
}
