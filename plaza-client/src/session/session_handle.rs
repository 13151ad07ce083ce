use crate::protocol::AnnouncePhase;
use crate::session::{SessionCommand, SessionError, SessionSnapshot};
use tokio::sync::{mpsc, oneshot};

/// Cloneable front door to a running session. The session stops once every
/// handle is dropped.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<SessionCommand>) -> Self {
        Self { command_tx }
    }

    pub async fn set_walking(&self, is_walking: bool) -> Result<(), SessionError> {
        self.command(SessionCommand::SetWalking(is_walking)).await
    }

    pub async fn leave(&self) -> Result<(), SessionError> {
        self.command(SessionCommand::Leave).await
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        let (tx, rx) = oneshot::channel();
        self.command(SessionCommand::Snapshot(tx)).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Announce phase in the current room; `None` outside a room.
    pub async fn phase(&self) -> Result<Option<AnnouncePhase>, SessionError> {
        Ok(self.snapshot().await?.phase)
    }

    async fn command(&self, command: SessionCommand) -> Result<(), SessionError> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| SessionError::Closed)
    }
}
