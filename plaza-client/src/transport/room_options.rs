use serde::{Deserialize, Serialize};

/// Room creation parameters forwarded to the transport on join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomOptions {
    /// 0 means unlimited.
    pub max_players: u8,
    pub is_open: bool,
    pub is_visible: bool,
}

impl Default for RoomOptions {
    fn default() -> Self {
        Self {
            max_players: 0,
            is_open: true,
            is_visible: true,
        }
    }
}
