use thiserror::Error;

/// Errors raised when parsing enumerated request values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown blood group: {0:?}")]
    BloodGroup(String),

    #[error("unknown gender: {0:?}")]
    Gender(String),
}
