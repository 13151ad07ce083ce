use crate::transport::{RoomOptions, TransportError};
use async_trait::async_trait;
use bytes::Bytes;
use plaza_core::{Channel, Receivers};

/// Realtime room transport the session runs on.
///
/// Lifecycle results arrive as [`TransportEvent`](crate::TransportEvent)s on
/// the channel handed to the adapter; the calls here only initiate them.
/// `send` must deliver at least once and in order per sender.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn connect(&self) -> Result<(), TransportError>;

    async fn join_room(&self, room: &str, options: &RoomOptions) -> Result<(), TransportError>;

    async fn leave_room(&self) -> Result<(), TransportError>;

    async fn send(
        &self,
        tag: u8,
        payload: Bytes,
        receivers: Receivers,
        channel: Channel,
    ) -> Result<(), TransportError>;
}
