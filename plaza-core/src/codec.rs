use crate::model::{MessageType, SyncMessage};
use bytes::Bytes;
use postcard::{from_bytes, to_allocvec};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    /// Tag not owned by this protocol. Other subsystems share the transport,
    /// so this is routine.
    #[error("unknown message tag {0}")]
    UnknownTag(u8),

    #[error("malformed payload: {0}")]
    Malformed(#[from] postcard::Error),
}

impl SyncMessage {
    /// Encode into the tag/payload pair the transport carries.
    pub fn encode(&self) -> Result<(MessageType, Bytes), CodecError> {
        let payload = match self {
            Self::JoinAnnounce(m) => to_allocvec(m)?,
            Self::CatchupAnnounce(m) => to_allocvec(m)?,
            Self::LiveState(m) => to_allocvec(m)?,
        };
        Ok((self.message_type(), Bytes::from(payload)))
    }

    pub fn decode(tag: u8, payload: &[u8]) -> Result<Self, CodecError> {
        let message = match MessageType::try_from(tag)? {
            MessageType::JoinAnnounce => Self::JoinAnnounce(from_bytes(payload)?),
            MessageType::CatchupAnnounce => Self::CatchupAnnounce(from_bytes(payload)?),
            MessageType::LiveState => Self::LiveState(from_bytes(payload)?),
        };
        Ok(message)
    }
}
