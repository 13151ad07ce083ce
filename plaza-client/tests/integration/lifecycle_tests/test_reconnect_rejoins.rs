use plaza_client::{LoopbackHub, Transport};
use plaza_core::AvatarCode;

use crate::integration::{generated_config, init_tracing};
use crate::utils::{CONVERGE_TIMEOUT_MS, converged, spawn_peer, wait_for_snapshot};

#[tokio::test(start_paused = true)]
async fn test_reconnect_rejoins() {
    init_tracing();

    let hub = LoopbackHub::new();
    let first = spawn_peer(&hub, generated_config("A1"));
    first.joined().await.expect("First peer did not join");
    let second = spawn_peer(&hub, generated_config("B2"));
    let old_id = second.joined().await.expect("Second peer did not join");

    for peer in [&first, &second] {
        wait_for_snapshot(&peer.handle, CONVERGE_TIMEOUT_MS, |s| converged(s, 2))
            .await
            .expect("Room did not converge");
    }

    second.transport.drop_connection("link lost").await;

    // Both sides forget the lost membership
    wait_for_snapshot(&first.handle, CONVERGE_TIMEOUT_MS, |s| converged(s, 1))
        .await
        .expect("First peer kept the lost peer");
    let lost = wait_for_snapshot(&second.handle, CONVERGE_TIMEOUT_MS, |s| s.room.is_none())
        .await
        .expect("Second peer did not tear down");
    assert!(lost.directory.peers.is_empty());
    assert_eq!(second.pipeline.released().len(), 2);

    // The adapter reconnects; the session rejoins on its own
    second.transport.connect().await.expect("Reconnect failed");
    let new_id = second.joined().await.expect("Second peer did not rejoin");
    assert_ne!(new_id, old_id);

    let seen_by_first = wait_for_snapshot(&first.handle, CONVERGE_TIMEOUT_MS, |s| {
        converged(s, 2)
    })
    .await
    .expect("First peer never rebound the second");
    assert_eq!(
        seen_by_first.directory.get(&new_id).and_then(|h| h.avatar_code()),
        Some(&AvatarCode::from("B2"))
    );
    assert!(seen_by_first.directory.get(&old_id).is_none());

    wait_for_snapshot(&second.handle, CONVERGE_TIMEOUT_MS, |s| converged(s, 2))
        .await
        .expect("Second peer never rebound the first");
}
