use crate::protocol::LocalIdentity;
use crate::transport::RoomOptions;
use std::time::Duration;

pub const DEFAULT_ROOM_NAME: &str = "OpenMetaMall_1";

/// Time other peers get to spawn the newcomer before it counts as announced.
pub const DEFAULT_ANNOUNCE_SETTLE: Duration = Duration::from_secs(5);

const DEFAULT_COMMAND_CAPACITY: usize = 100;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub room_name: String,
    pub room_options: RoomOptions,
    pub identity: LocalIdentity,
    pub announce_settle: Duration,
    /// Re-broadcast the local walking flag at this period. Off by default;
    /// edges are always sent.
    pub live_state_refresh: Option<Duration>,
    /// Use the transport's sender id for announcements that carry no origin.
    /// When off, such announcements go through positional slot matching.
    pub infer_origin_from_sender: bool,
    pub command_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            room_name: DEFAULT_ROOM_NAME.to_owned(),
            room_options: RoomOptions::default(),
            identity: LocalIdentity::default(),
            announce_settle: DEFAULT_ANNOUNCE_SETTLE,
            live_state_refresh: None,
            infer_origin_from_sender: true,
            command_capacity: DEFAULT_COMMAND_CAPACITY,
        }
    }
}

impl SessionConfig {
    pub fn new(identity: LocalIdentity) -> Self {
        Self {
            identity,
            ..Self::default()
        }
    }

    pub fn with_room_name(mut self, room_name: impl Into<String>) -> Self {
        self.room_name = room_name.into();
        self
    }

    pub fn with_room_options(mut self, room_options: RoomOptions) -> Self {
        self.room_options = room_options;
        self
    }

    pub fn with_announce_settle(mut self, settle: Duration) -> Self {
        self.announce_settle = settle;
        self
    }

    pub fn with_live_state_refresh(mut self, period: Duration) -> Self {
        self.live_state_refresh = Some(period);
        self
    }

    pub fn with_infer_origin_from_sender(mut self, infer: bool) -> Self {
        self.infer_origin_from_sender = infer;
        self
    }

    pub fn with_command_capacity(mut self, capacity: usize) -> Self {
        self.command_capacity = capacity.max(1);
        self
    }
}
