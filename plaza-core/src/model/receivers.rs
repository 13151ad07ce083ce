use crate::model::peer::PeerId;
use serde::{Deserialize, Serialize};

/// Which room members a message is delivered to.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq)]
pub enum Receivers {
    /// Everyone except the sender.
    Others,
    /// Everyone, the sender included.
    All,
    /// A single member. Transports without unicast may degrade this to
    /// `Others`; receivers filter on the payload's target.
    Peer(PeerId),
}
