use plaza_core::{Announcement, AvatarCode, AvatarVariant, PeerId};

use crate::integration::{generated_config, init_tracing};
use crate::utils::{scripted_peer, settle};

#[tokio::test(start_paused = true)]
async fn test_stale_origin_dropped() {
    init_tracing();

    let peer = scripted_peer(generated_config("L0"));
    peer.join(Vec::new()).expect("Failed to join");

    // Join announcement from a peer this session never saw enter
    let ghost = PeerId::new();
    let join = Announcement {
        variant: AvatarVariant::Generated,
        image_index: 0,
        avatar_code: Some(AvatarCode::from("G1")),
        origin: Some(ghost),
    };
    peer.deliver(ghost, join.into()).expect("Failed to deliver");
    settle().await;

    let snapshot = peer.handle.snapshot().await.expect("Snapshot failed");
    assert!(snapshot.directory.get(&ghost).is_none());
    assert_eq!(snapshot.directory.peers.len(), 1);

    // Nothing spawned and no reply sent
    assert_eq!(peer.pipeline.spawned_codes(), vec![AvatarCode::from("L0")]);
    assert_eq!(peer.transport.sent().len(), 1);
}
