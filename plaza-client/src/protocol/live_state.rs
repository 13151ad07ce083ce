use crate::directory::PeerDirectory;
use crate::pipeline::VisualHandle;
use plaza_core::{LiveState, PeerId};

/// Where an inbound live state landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveStateApplied {
    pub peer_id: PeerId,
    pub visual: Option<VisualHandle>,
    pub is_walking: bool,
}

/// Last write wins. Returns `None` when no active handle carries the code;
/// the directory is left untouched in that case.
pub fn apply(state: &LiveState, directory: &mut PeerDirectory) -> Option<LiveStateApplied> {
    let handle = directory.find_by_avatar_code_mut(&state.avatar_code)?;
    handle.set_walking(state.is_walking);

    Some(LiveStateApplied {
        peer_id: handle.peer_id(),
        visual: handle.visual(),
        is_walking: state.is_walking,
    })
}

/// Producer side: turns a per-frame walking flag into edge-triggered sends.
#[derive(Debug, Default, Clone)]
pub struct WalkingTracker {
    current: bool,
    published: bool,
}

impl WalkingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the latest local flag. Returns the value to publish on a transition.
    pub fn observe(&mut self, is_walking: bool) -> Option<bool> {
        self.current = is_walking;
        if self.published == is_walking {
            return None;
        }
        self.published = is_walking;
        Some(is_walking)
    }

    pub fn current(&self) -> bool {
        self.current
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
