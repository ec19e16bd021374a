use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bloodlink_client::{BloodBankApi, Reply};
use bloodlink_core::{DonorMatchSet, NotificationOutcome, NotificationRequest, SearchParameters};
use bloodlink_state::SessionStore;
use tracing::{info, warn};

use crate::error::{CallSite, NOTIFICATION_FAILED, WorkflowError, WorkflowStateError};

/// Sends one bulk notification covering every donor in a match set.
///
/// At most one dispatch runs at a time per instance; a second call while one
/// is in flight fails with [`WorkflowStateError::DispatchInFlight`].
#[derive(Debug)]
pub struct NotificationFanout {
    api: Arc<dyn BloodBankApi>,
    store: SessionStore,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the dispatch ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl NotificationFanout {
    pub fn new(api: Arc<dyn BloodBankApi>, store: SessionStore) -> Self {
        Self {
            api,
            store,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Whether a notify may be started for `matches` right now.
    pub fn can_notify(&self, matches: &DonorMatchSet) -> bool {
        !matches.is_empty() && !self.is_in_flight()
    }

    /// Notify every donor in `matches` about the stored request.
    ///
    /// The payload pairs the current search `params` with the stored request
    /// snapshot; the two may differ after a manual re-search. Preconditions
    /// are checked before anything is sent.
    pub async fn notify_all(
        &self,
        params: &SearchParameters,
        matches: &DonorMatchSet,
    ) -> Result<NotificationOutcome, WorkflowError> {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            return Err(WorkflowStateError::DispatchInFlight.into());
        };
        if matches.is_empty() {
            return Err(WorkflowStateError::NoMatches.into());
        }
        let Some(entry) = self.store.get().await? else {
            warn!(session = %self.store.session(), "notify attempted without a stored request");
            return Err(WorkflowStateError::MissingRequestContext.into());
        };

        let payload = NotificationRequest::new(params, entry.request);
        let reply = self
            .api
            .notify_donors(&payload)
            .await
            .map_err(|e| WorkflowError::from_client(e, CallSite::Notify))?;

        match reply {
            Reply::Accepted(outcome) => {
                info!(search = %params, donors = matches.len(), "bulk notification sent");
                Ok(outcome)
            }
            Reply::Rejected(rejection) => {
                warn!(status = rejection.status, search = %params, "bulk notification refused");
                Err(WorkflowError::Rejected(
                    rejection.message_or(NOTIFICATION_FAILED),
                ))
            }
        }
    }
}
