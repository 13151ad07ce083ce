use plaza_client::LoopbackHub;
use std::time::Duration;

use crate::integration::{generated_config, init_tracing};
use crate::utils::{CONVERGE_TIMEOUT_MS, converged, settle, spawn_peer, wait_for_snapshot};

#[tokio::test(start_paused = true)]
async fn test_refresh_reaches_late_joiner() {
    init_tracing();

    let hub = LoopbackHub::new();
    let walker = spawn_peer(
        &hub,
        generated_config("R1").with_live_state_refresh(Duration::from_secs(1)),
    );
    let walker_id = walker.joined().await.expect("Walker did not join");

    // Edge goes out while nobody else is in the room
    walker.handle.set_walking(true).await.expect("Command failed");
    settle().await;

    let late = spawn_peer(&hub, generated_config("R2"));
    late.joined().await.expect("Late joiner did not join");
    wait_for_snapshot(&late.handle, CONVERGE_TIMEOUT_MS, |s| converged(s, 2))
        .await
        .expect("Room did not converge");

    // The periodic refresh fills in what the edge could not
    let seen = wait_for_snapshot(&late.handle, CONVERGE_TIMEOUT_MS, |s| {
        s.directory.get(&walker_id).is_some_and(|h| h.is_walking())
    })
    .await
    .expect("Refresh never reached the late joiner");
    assert!(seen.directory.get(&walker_id).is_some_and(|h| h.is_active()));
}
