//! Join announcement state for the local peer.
//!
//! `Spawning -> Announcing -> Announced`. The join announcement goes out on
//! entering `Announcing`; `Announced` is reached after a fixed settle delay.
//! The delay is a heuristic, not a barrier: a peer slower than the window
//! still reconciles, just later.

use plaza_core::{
    Announcement, AvatarCode, AvatarVariant, CatchupAnnouncement, PeerId, Receivers,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnouncePhase {
    Spawning,
    Announcing,
    Announced,
}

#[derive(Debug, Clone)]
pub struct AnnounceState {
    phase: AnnouncePhase,
    settle_deadline: Option<Instant>,
}

impl Default for AnnounceState {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnounceState {
    pub fn new() -> Self {
        Self {
            phase: AnnouncePhase::Spawning,
            settle_deadline: None,
        }
    }

    pub fn phase(&self) -> AnnouncePhase {
        self.phase
    }

    /// Armed only while `Announcing`.
    pub fn settle_deadline(&self) -> Option<Instant> {
        self.settle_deadline
    }

    /// Spawn finished and the join announcement was handed to the transport.
    pub fn begin(&mut self, now: Instant, settle: Duration) {
        if self.phase != AnnouncePhase::Spawning {
            return;
        }
        self.phase = AnnouncePhase::Announcing;
        self.settle_deadline = Some(now + settle);
    }

    /// Returns true on the `Announcing -> Announced` transition.
    pub fn settle(&mut self) -> bool {
        if self.phase != AnnouncePhase::Announcing {
            return false;
        }
        self.phase = AnnouncePhase::Announced;
        self.settle_deadline = None;
        true
    }
}

/// How the local peer presents itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalIdentity {
    pub variant: AvatarVariant,
    pub avatar_code: Option<AvatarCode>,
    pub image_index: u32,
}

impl Default for LocalIdentity {
    fn default() -> Self {
        Self {
            variant: AvatarVariant::Generated,
            avatar_code: None,
            image_index: 0,
        }
    }
}

impl LocalIdentity {
    pub fn generated(code: impl Into<AvatarCode>) -> Self {
        Self {
            variant: AvatarVariant::Generated,
            avatar_code: Some(code.into()),
            image_index: 0,
        }
    }

    pub fn custom() -> Self {
        Self {
            variant: AvatarVariant::Custom,
            avatar_code: None,
            image_index: 0,
        }
    }

    pub fn with_image_index(mut self, image_index: u32) -> Self {
        self.image_index = image_index;
        self
    }

    /// Generated identities always leave with a code, custom ones never do.
    pub fn resolve(self) -> Self {
        match self.variant {
            AvatarVariant::Custom => Self {
                avatar_code: None,
                ..self
            },
            AvatarVariant::Generated | AvatarVariant::Uninitialized => Self {
                variant: AvatarVariant::Generated,
                avatar_code: self.avatar_code.or_else(|| Some(AvatarCode::generate())),
                image_index: self.image_index,
            },
        }
    }

    pub fn announcement(&self, origin: PeerId) -> Announcement {
        Announcement {
            variant: self.variant,
            image_index: self.image_index,
            avatar_code: self.avatar_code.clone(),
            origin: Some(origin),
        }
    }

    /// Reply to a join announcement, addressed to the announcer when it is known.
    pub fn catch_up_for(
        &self,
        local: PeerId,
        join: &Announcement,
    ) -> (CatchupAnnouncement, Receivers) {
        let receivers = join.origin.map_or(Receivers::Others, Receivers::Peer);
        let reply = CatchupAnnouncement {
            announcement: self.announcement(local),
            target: join.origin,
        };
        (reply, receivers)
    }
}
