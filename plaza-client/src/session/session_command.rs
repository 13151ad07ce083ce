use crate::directory::DirectorySnapshot;
use crate::protocol::AnnouncePhase;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// Requests from the application into the session task.
#[derive(Debug)]
pub enum SessionCommand {
    /// Latest locally observed walking flag. Safe to send every frame.
    SetWalking(bool),

    /// Leave the room. Cancels a pending announce cycle.
    Leave,

    Snapshot(oneshot::Sender<SessionSnapshot>),
}

/// What the session looks like from outside at one instant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub room: Option<String>,
    pub phase: Option<AnnouncePhase>,
    pub directory: DirectorySnapshot,
}
