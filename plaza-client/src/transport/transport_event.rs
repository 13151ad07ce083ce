use bytes::Bytes;
use plaza_core::PeerId;

/// Events the transport adapter feeds into the session.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// Session with the transport established (again).
    Connected,

    /// The local peer entered a room. `members` are the peers already
    /// present, oldest first.
    JoinedRoom { local: PeerId, members: Vec<PeerId> },

    PeerJoined(PeerId),

    PeerLeft(PeerId),

    /// Inbound custom event. `tag` is not necessarily one of ours.
    Message {
        sender: PeerId,
        tag: u8,
        payload: Bytes,
    },

    /// The local peer left the room on request.
    LeftRoom,

    /// Connection lost. Room membership is gone with it.
    Disconnected { reason: String },
}
