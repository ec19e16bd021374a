use std::time::Duration;

use bloodlink_client::Error as ClientError;
use bloodlink_core::ValidationErrors;
use bloodlink_state::StateError;
use thiserror::Error;

use crate::controller::WorkflowPhase;

pub const CANNOT_CONNECT: &str = "Cannot connect to server. Please make sure backend is running.";
pub const FETCH_FAILED: &str = "Failed to fetch donors. Please try again.";
pub const NOTIFY_SLOW: &str = "Email sending is taking longer than expected.";
pub const REQUEST_FAILED: &str = "Request failed. Please try again.";
pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const NOTIFICATION_FAILED: &str = "Notification failed";

/// Errors surfaced by the workflow components.
///
/// Every variant is terminal for the operation that produced it. Display
/// text is what the user sees.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Field-level problems found before any network call.
    #[error("{0}")]
    Validation(ValidationErrors),

    /// The collaborator answered but refused.
    #[error("{0}")]
    Rejected(String),

    /// No answer, or no answer in time.
    #[error("{message}")]
    Connectivity {
        kind: ConnectivityKind,
        message: String,
    },

    #[error(transparent)]
    State(#[from] WorkflowStateError),

    #[error("{0}")]
    Unexpected(String),

    #[error("workflow store error: {0}")]
    Store(#[from] StateError),
}

/// How a connectivity failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityKind {
    Unreachable,
    TimedOut(Duration),
}

/// A precondition of the workflow was violated. Nothing was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowStateError {
    #[error("No search parameters found. Please submit a blood request first.")]
    NoSearchContext,

    #[error("No request data found. Please submit a blood request first.")]
    MissingRequestContext,

    #[error("No donors to notify.")]
    NoMatches,

    #[error("Notification already in progress.")]
    DispatchInFlight,

    #[error("cannot {action} while {from}")]
    InvalidTransition {
        from: WorkflowPhase,
        action: &'static str,
    },
}

/// Which call a transport failure came from; picks the user-facing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CallSite {
    Create,
    Find,
    Notify,
}

impl WorkflowError {
    pub(crate) fn from_client(err: ClientError, site: CallSite) -> Self {
        match err {
            ClientError::Connection(_) => Self::Connectivity {
                kind: ConnectivityKind::Unreachable,
                message: CANNOT_CONNECT.to_owned(),
            },
            ClientError::Timeout(after) => {
                let message = match site {
                    CallSite::Create => REQUEST_FAILED,
                    CallSite::Find => FETCH_FAILED,
                    CallSite::Notify => NOTIFY_SLOW,
                };
                Self::Connectivity {
                    kind: ConnectivityKind::TimedOut(after),
                    message: message.to_owned(),
                }
            }
            ClientError::Deserialization(_) | ClientError::Configuration(_) => {
                let message = match site {
                    CallSite::Find => FETCH_FAILED,
                    CallSite::Create | CallSite::Notify => REQUEST_FAILED,
                };
                Self::Unexpected(message.to_owned())
            }
        }
    }

    /// Returns `true` if the user should check connectivity and retry.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity { .. })
    }

    /// Returns `true` if a notify dispatch took longer than its timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Connectivity {
                kind: ConnectivityKind::TimedOut(_),
                ..
            }
        )
    }

    pub fn state(&self) -> Option<&WorkflowStateError> {
        match self {
            Self::State(err) => Some(err),
            _ => None,
        }
    }

    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
