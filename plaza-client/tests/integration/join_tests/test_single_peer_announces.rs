use plaza_client::AnnouncePhase;
use plaza_core::{AvatarCode, AvatarVariant, Channel, Receivers, SyncMessage};
use std::time::Duration;
use tokio::time::sleep;

use crate::integration::{generated_config, init_tracing};
use crate::utils::{scripted_peer, settle};

#[tokio::test(start_paused = true)]
async fn test_single_peer_announces() {
    init_tracing();

    let peer = scripted_peer(generated_config("A1"));
    peer.join(Vec::new()).expect("Failed to join");
    settle().await;

    // Exactly one join announcement, to everybody else
    let sent = peer.transport.sent();
    assert_eq!(sent.len(), 1, "Expected a single join announcement");
    assert_eq!(sent[0].receivers, Receivers::Others);
    assert_eq!(sent[0].channel, Channel::Reliable);
    match &sent[0].message {
        SyncMessage::JoinAnnounce(join) => {
            assert_eq!(join.variant, AvatarVariant::Generated);
            assert_eq!(join.avatar_code, Some(AvatarCode::from("A1")));
            assert_eq!(join.origin, Some(peer.local));
        }
        other => panic!("Expected join announcement, got {:?}", other),
    }

    // Local avatar is bound and shown
    let snapshot = peer.handle.snapshot().await.expect("Snapshot failed");
    assert_eq!(snapshot.room.as_deref(), Some("test-room"));
    assert_eq!(snapshot.phase, Some(AnnouncePhase::Announcing));
    let local = snapshot.directory.get(&peer.local).expect("Local handle missing");
    assert!(local.is_local());
    assert_eq!(local.avatar_code(), Some(&AvatarCode::from("A1")));
    assert_eq!(peer.pipeline.spawned_codes(), vec![AvatarCode::from("A1")]);

    // Nobody answers; the cycle still completes after the settle delay
    sleep(Duration::from_secs(6)).await;
    assert_eq!(
        peer.handle.phase().await.expect("Phase query failed"),
        Some(AnnouncePhase::Announced)
    );
    assert_eq!(peer.transport.sent().len(), 1);
}
