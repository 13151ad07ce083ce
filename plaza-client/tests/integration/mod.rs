pub mod join_tests;
pub mod lifecycle_tests;
pub mod live_state_tests;

use plaza_client::{LocalIdentity, SessionConfig};
use plaza_core::{Announcement, AvatarVariant, CatchupAnnouncement, PeerId};
use tracing::Level;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn generated_config(code: &str) -> SessionConfig {
    SessionConfig::new(LocalIdentity::generated(code)).with_room_name("test-room")
}

pub fn custom_config() -> SessionConfig {
    SessionConfig::new(LocalIdentity::custom()).with_room_name("test-room")
}

/// A catch-up as `origin` would send it to `target`.
pub fn catch_up(code: &str, origin: Option<PeerId>, target: Option<PeerId>) -> CatchupAnnouncement {
    CatchupAnnouncement {
        announcement: Announcement {
            variant: AvatarVariant::Generated,
            image_index: 0,
            avatar_code: Some(code.into()),
            origin,
        },
        target,
    }
}
