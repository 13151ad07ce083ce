use plaza_client::LoopbackHub;
use plaza_core::AvatarCode;

use crate::integration::{generated_config, init_tracing};
use crate::utils::{CONVERGE_TIMEOUT_MS, converged, spawn_peer, wait_for_snapshot};

#[tokio::test(start_paused = true)]
async fn test_late_joiner_catches_up() {
    init_tracing();

    let hub = LoopbackHub::new();
    let first = spawn_peer(&hub, generated_config("A1"));
    let first_id = first.joined().await.expect("First peer did not join");

    let second = spawn_peer(&hub, generated_config("B2"));
    let second_id = second.joined().await.expect("Second peer did not join");

    // The newcomer learns about the peer that was already there, and vice versa
    let seen_by_second = wait_for_snapshot(&second.handle, CONVERGE_TIMEOUT_MS, |s| {
        converged(s, 2)
    })
    .await
    .expect("Second peer never bound the first");
    let seen_by_first = wait_for_snapshot(&first.handle, CONVERGE_TIMEOUT_MS, |s| {
        converged(s, 2)
    })
    .await
    .expect("First peer never bound the second");

    assert_eq!(
        seen_by_second.directory.get(&first_id).and_then(|h| h.avatar_code()),
        Some(&AvatarCode::from("A1"))
    );
    assert_eq!(
        seen_by_first.directory.get(&second_id).and_then(|h| h.avatar_code()),
        Some(&AvatarCode::from("B2"))
    );

    // Each side spawned each avatar exactly once
    let mut first_codes = first.pipeline.spawned_codes();
    first_codes.sort();
    let mut second_codes = second.pipeline.spawned_codes();
    second_codes.sort();
    let expected = vec![AvatarCode::from("A1"), AvatarCode::from("B2")];
    assert_eq!(first_codes, expected);
    assert_eq!(second_codes, expected);
}
