use serde::{Deserialize, Serialize};

/// Delivery guarantee requested from the transport.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Default)]
pub enum Channel {
    #[default]
    Reliable,
    Unreliable,
    ReliableUnordered,
}
