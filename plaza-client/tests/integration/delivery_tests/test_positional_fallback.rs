use plaza_core::{AvatarCode, PeerId};

use crate::integration::{catch_up, generated_config, init_tracing};
use crate::utils::{scripted_peer, settle};

#[tokio::test(start_paused = true)]
async fn test_positional_fallback() {
    init_tracing();

    let oldest = PeerId::new();
    let younger = PeerId::new();
    let peer = scripted_peer(generated_config("L0").with_infer_origin_from_sender(false));
    peer.join(vec![oldest, younger]).expect("Failed to join");

    // Without an origin, codes fill pending peers in join order
    peer.deliver(younger, catch_up("P1", None, None).into())
        .expect("Failed to deliver");
    peer.deliver(oldest, catch_up("P2", None, None).into())
        .expect("Failed to deliver");
    // Repeat of a code that is already shown
    peer.deliver(younger, catch_up("P1", None, None).into())
        .expect("Failed to deliver");
    settle().await;

    let snapshot = peer.handle.snapshot().await.expect("Snapshot failed");
    assert_eq!(
        snapshot.directory.get(&oldest).and_then(|h| h.avatar_code()),
        Some(&AvatarCode::from("P1"))
    );
    assert_eq!(
        snapshot.directory.get(&younger).and_then(|h| h.avatar_code()),
        Some(&AvatarCode::from("P2"))
    );
    assert_eq!(
        peer.pipeline.spawned_codes(),
        vec![
            AvatarCode::from("L0"),
            AvatarCode::from("P1"),
            AvatarCode::from("P2")
        ]
    );
}
