//! Transport-level error types for the Bloodlink client.

use std::time::Duration;

use thiserror::Error;

/// Errors that prevent the client from obtaining a collaborator reply.
///
/// A collaborator that answers but refuses the request is not an error at
/// this level; see [`Reply::Rejected`](crate::Reply::Rejected).
#[derive(Debug, Error)]
pub enum Error {
    /// Connection error (network failure, DNS resolution, refused, etc.).
    #[error("connection error: {0}")]
    Connection(String),

    /// No reply within the call's timeout. The collaborator may still
    /// complete the work; nothing is cancelled on its side.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Response deserialization error.
    #[error("failed to deserialize response: {0}")]
    Deserialization(String),

    /// Client configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Map a reqwest failure, telling timeouts apart from other transport errors.
    pub(crate) fn from_transport(err: &reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Connection(err.to_string())
        }
    }

    /// Returns `true` if the collaborator could not be reached or did not
    /// answer in time.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout(_))
    }

    /// Returns `true` if this is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connectivity_classification() {
        assert!(Error::Connection("refused".into()).is_connectivity());
        assert!(Error::Timeout(Duration::from_secs(1)).is_connectivity());
        assert!(Error::Timeout(Duration::from_secs(1)).is_timeout());
        assert!(!Error::Connection("refused".into()).is_timeout());
        assert!(!Error::Deserialization("bad".into()).is_connectivity());
        assert!(!Error::Configuration("bad".into()).is_connectivity());
    }

    #[test]
    fn display() {
        assert_eq!(
            Error::Timeout(Duration::from_secs(60)).to_string(),
            "request timed out after 60s"
        );
    }
}
