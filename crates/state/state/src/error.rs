use thiserror::Error;

/// Errors from workflow store operations.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("invalid session id: {0:?}")]
    InvalidSession(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for StateError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for StateError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
