mod avatar;
mod channel;
mod message;
mod message_type;
mod peer;
mod receivers;

pub use avatar::{AvatarCode, AvatarVariant};
pub use channel::Channel;
pub use message::{Announcement, CatchupAnnouncement, LiveState, SyncMessage};
pub use message_type::MessageType;
pub use peer::{ParsePeerIdError, PeerId};
pub use receivers::Receivers;
