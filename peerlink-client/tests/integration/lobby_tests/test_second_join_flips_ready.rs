use crate::utils::{LocalRelay, init_tracing, join, wait_for_view};
use peerlink_client::games::WarsGame;
use peerlink_core::model::GamePhase;

#[tokio::test]
async fn test_second_join_flips_ready() {
    init_tracing();

    let relay = LocalRelay::new();

    let alice = join(&relay, "wars:1", "alice", WarsGame)
        .await
        .expect("alice failed to join");

    assert!(
        wait_for_view(&alice, |v| v.players.len() == 1 && !v.is_ready).await,
        "a room of one must not be ready"
    );
    assert_eq!(alice.view().phase, GamePhase::Lobby);

    let bob = join(&relay, "wars:1", "bob", WarsGame)
        .await
        .expect("bob failed to join");

    assert!(
        wait_for_view(&alice, |v| v.players.len() == 2 && v.is_ready).await,
        "second join should flip readiness"
    );
    assert!(
        wait_for_view(&bob, |v| v.is_ready && !v.is_leader).await,
        "bob joined second and must not lead"
    );
    assert!(alice.view().is_leader, "first joiner leads");
    assert_eq!(alice.view().phase, GamePhase::Ready);
}
