use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session has shut down")]
    Closed,
}
