use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport is not connected")]
    NotConnected,

    #[error("not in a room")]
    NotInRoom,

    #[error("transport closed")]
    Closed,

    #[error("rejected by transport: {0}")]
    Rejected(String),
}
