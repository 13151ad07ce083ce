use crate::model::avatar::{AvatarCode, AvatarVariant};
use crate::model::channel::Channel;
use crate::model::message_type::MessageType;
use crate::model::peer::PeerId;
use crate::traits::Message;
use serde::{Deserialize, Serialize};

/// Identity/appearance a peer announces about itself.
#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
pub struct Announcement {
    /// Variant the announcer displays.
    pub variant: AvatarVariant,
    /// Index of the source image the generated avatar was built from.
    pub image_index: u32,
    /// Present for generated avatars only.
    pub avatar_code: Option<AvatarCode>,
    /// Transport id of the announcer, when known.
    pub origin: Option<PeerId>,
}

/// Reply from an already-present peer to a newcomer.
#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
pub struct CatchupAnnouncement {
    pub announcement: Announcement,
    /// The newcomer this reply is meant for. `None` addresses everyone.
    pub target: Option<PeerId>,
}

impl CatchupAnnouncement {
    pub fn is_for(&self, peer_id: &PeerId) -> bool {
        self.target.is_none_or(|target| &target == peer_id)
    }
}

/// Mutable per-avatar animation state.
#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
pub struct LiveState {
    pub avatar_code: AvatarCode,
    pub is_walking: bool,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SyncMessage {
    JoinAnnounce(Announcement),
    CatchupAnnounce(CatchupAnnouncement),
    LiveState(LiveState),
}

impl SyncMessage {
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::JoinAnnounce(m) => m.message_type(),
            Self::CatchupAnnounce(m) => m.message_type(),
            Self::LiveState(m) => m.message_type(),
        }
    }

    pub fn channel(&self) -> Channel {
        match self {
            Self::JoinAnnounce(m) => m.channel(),
            Self::CatchupAnnounce(m) => m.channel(),
            Self::LiveState(m) => m.channel(),
        }
    }
}

impl Message for Announcement {
    fn message_type(&self) -> MessageType {
        MessageType::JoinAnnounce
    }

    fn channel(&self) -> Channel {
        Channel::Reliable
    }
}

impl Message for CatchupAnnouncement {
    fn message_type(&self) -> MessageType {
        MessageType::CatchupAnnounce
    }

    fn channel(&self) -> Channel {
        Channel::Reliable
    }
}

impl Message for LiveState {
    fn message_type(&self) -> MessageType {
        MessageType::LiveState
    }

    fn channel(&self) -> Channel {
        Channel::Reliable
    }
}

impl From<Announcement> for SyncMessage {
    fn from(m: Announcement) -> Self {
        Self::JoinAnnounce(m)
    }
}

impl From<CatchupAnnouncement> for SyncMessage {
    fn from(m: CatchupAnnouncement) -> Self {
        Self::CatchupAnnounce(m)
    }
}

impl From<LiveState> for SyncMessage {
    fn from(m: LiveState) -> Self {
        Self::LiveState(m)
    }
}
