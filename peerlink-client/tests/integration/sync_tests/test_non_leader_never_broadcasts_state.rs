use crate::utils::{LocalRelay, init_tracing, join, settle, wait_for_view};
use peerlink_client::games::RunGame;
use peerlink_core::model::GamePhase;

/// Role-exclusivity invariant: exactly one writer for coarse state. The
/// relay records every snapshot sender; across several broadcast intervals
/// only the leader may show up.
#[tokio::test]
async fn test_non_leader_never_broadcasts_state() {
    init_tracing();

    let relay = LocalRelay::new();
    let alice = join(&relay, "run:excl", "alice", RunGame)
        .await
        .expect("alice failed to join");
    let bob = join(&relay, "run:excl", "bob", RunGame)
        .await
        .expect("bob failed to join");

    assert!(wait_for_view(&alice, |v| v.is_ready && v.is_leader).await);
    alice.start().await.expect("start command");
    assert!(wait_for_view(&bob, |v| v.phase == GamePhase::Active).await);

    // Several 100ms sync intervals' worth of broadcasting.
    settle().await;
    settle().await;

    let alice_sid = alice.view().local_sid.expect("alice has a sid");
    let senders = relay.sync_senders().await;
    assert!(
        !senders.is_empty(),
        "the leader must have broadcast at least once"
    );
    assert!(
        senders.iter().all(|sid| *sid == alice_sid),
        "a non-leader emitted a coarse-state snapshot: {senders:?}"
    );
}
