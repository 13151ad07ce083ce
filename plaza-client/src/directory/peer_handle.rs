use crate::pipeline::VisualHandle;
use plaza_core::{AvatarCode, AvatarVariant, PeerId};
use serde::{Deserialize, Serialize};

/// Local representation of one room member, self included.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeerHandle {
    peer_id: PeerId,
    is_local: bool,
    variant: AvatarVariant,
    avatar_code: Option<AvatarCode>,
    is_walking: bool,
    visual: Option<VisualHandle>,
}

impl PeerHandle {
    pub(crate) fn new(peer_id: PeerId, is_local: bool) -> Self {
        Self {
            peer_id,
            is_local,
            variant: AvatarVariant::Uninitialized,
            avatar_code: None,
            is_walking: false,
            visual: None,
        }
    }

    pub fn peer_id(&self) -> PeerId {
        self.peer_id
    }

    pub fn is_local(&self) -> bool {
        self.is_local
    }

    pub fn variant(&self) -> AvatarVariant {
        self.variant
    }

    pub fn is_active(&self) -> bool {
        self.variant.is_active()
    }

    pub fn avatar_code(&self) -> Option<&AvatarCode> {
        self.avatar_code.as_ref()
    }

    pub fn is_walking(&self) -> bool {
        self.is_walking
    }

    pub fn visual(&self) -> Option<VisualHandle> {
        self.visual
    }

    pub(crate) fn set_walking(&mut self, is_walking: bool) {
        self.is_walking = is_walking;
    }

    /// Swap in a new visual, handing back the one it replaces.
    pub(crate) fn replace_visual(&mut self, visual: VisualHandle) -> Option<VisualHandle> {
        self.visual.replace(visual)
    }

    // Write-once bookkeeping lives in PeerDirectory::bind.
    pub(crate) fn activate(&mut self, variant: AvatarVariant, code: Option<AvatarCode>) {
        self.variant = variant;
        self.avatar_code = code;
    }
}
