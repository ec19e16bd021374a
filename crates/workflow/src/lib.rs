//! The blood request workflow: submit a request, match donors, notify them.
//!
//! Three components do the work and share one [`SessionStore`]:
//!
//! - [`RequestSubmission`] validates a draft, registers it with the
//!   request-intake collaborator, and writes it to the store.
//! - [`DonorMatching`] resolves search parameters from navigation or from
//!   the store and queries the donor directory.
//! - [`NotificationFanout`] pairs the current search with the stored request
//!   and dispatches one bulk notification.
//!
//! [`WorkflowController`] sequences them as a state machine and drops match
//! results that arrive for a superseded search.
//!
//! [`SessionStore`]: bloodlink_state::SessionStore

pub mod config;
pub mod controller;
pub mod error;
pub mod matching;
pub mod notification;
pub mod status;
pub mod submission;

pub use config::WorkflowConfig;
pub use controller::{Applied, MatchTicket, WorkflowController, WorkflowInstanceId, WorkflowPhase};
pub use error::{ConnectivityKind, WorkflowError, WorkflowStateError};
pub use matching::{DonorMatching, ParameterSource, ResolvedSearch};
pub use notification::NotificationFanout;
pub use status::{DEFAULT_STATUS_DISPLAY, Status, StatusKind, StatusSlot};
pub use submission::{RequestForm, RequestSubmission, Submitted};
