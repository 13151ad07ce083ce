use crate::codec::CodecError;
use serde::{Deserialize, Serialize};

/// Event tags on the transport. Kept below 200, which the transport reserves.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq)]
#[repr(u8)]
pub enum MessageType {
    LiveState = 197,
    CatchupAnnounce = 198,
    JoinAnnounce = 199,
}

impl MessageType {
    pub const fn tag(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for MessageType {
    type Error = CodecError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            197 => Ok(Self::LiveState),
            198 => Ok(Self::CatchupAnnounce),
            199 => Ok(Self::JoinAnnounce),
            other => Err(CodecError::UnknownTag(other)),
        }
    }
}

impl From<MessageType> for u8 {
    fn from(value: MessageType) -> Self {
        value.tag()
    }
}
