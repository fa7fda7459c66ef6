use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KvError {
    /// `commit` or `rollback` was called while only the global transaction exists.
    #[error("ActiveTransactionNotFound")]
    ActiveTransactionNotFound,

    #[error("Looks like have no command. Please enter command.")]
    EmptyCommand,

    #[error("Unknown command.")]
    UnknownCommand(String),

    #[error("Wrong command format.")]
    WrongFormat {
        command: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Session closed: {0}")]
    SessionClosed(String),
}

pub type Result<T> = std::result::Result<T, KvError>;

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for KvError {
    fn from(err: tokio::sync::mpsc::error::SendError<T>) -> Self {
        Self::SessionClosed(err.to_string())
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for KvError {
    fn from(err: tokio::sync::oneshot::error::RecvError) -> Self {
        Self::SessionClosed(err.to_string())
    }
}
