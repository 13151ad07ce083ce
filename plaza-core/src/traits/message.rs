use crate::model::{Channel, MessageType};
use serde::{Serialize, de::DeserializeOwned};

/// A payload that travels on its own transport event tag.
pub trait Message: Serialize + DeserializeOwned + Send + Sync + 'static {
    fn message_type(&self) -> MessageType;

    fn channel(&self) -> Channel {
        Channel::Reliable
    }
}
