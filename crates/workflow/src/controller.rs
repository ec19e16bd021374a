use std::fmt;
use std::sync::Arc;

use bloodlink_client::BloodBankApi;
use bloodlink_core::{BloodRequestDraft, DonorMatchSet, NotificationOutcome, SearchParameters};
use bloodlink_state::SessionStore;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::config::WorkflowConfig;
use crate::error::{WorkflowError, WorkflowStateError};
use crate::matching::{DonorMatching, ParameterSource, ResolvedSearch};
use crate::notification::NotificationFanout;
use crate::status::{Status, StatusSlot};
use crate::submission::{RequestSubmission, Submitted};

/// Where a workflow instance currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowPhase {
    Idle,
    Submitting,
    MatchPending,
    MatchReady,
    Notifying,
    NotifyDone,
}

impl fmt::Display for WorkflowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::MatchPending => "matching",
            Self::MatchReady => "showing matches",
            Self::Notifying => "notifying",
            Self::NotifyDone => "showing notify status",
        })
    }
}

/// Identifies one match query. A new id is minted each time the search
/// changes, so answers to older queries can be recognized and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct WorkflowInstanceId(Uuid);

impl WorkflowInstanceId {
    fn mint() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for WorkflowInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A match query handed out by the controller, to be answered through
/// [`WorkflowController::apply_matches`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchTicket {
    pub instance: WorkflowInstanceId,
    pub search: ResolvedSearch,
}

impl MatchTicket {
    pub fn parameters(&self) -> &SearchParameters {
        &self.search.parameters
    }
}

/// What [`WorkflowController::apply_matches`] did with a result.
#[derive(Debug)]
pub enum Applied {
    /// The matches are now current.
    Ready(usize),
    /// The query failed; the match set is empty and the error is recorded.
    Failed(WorkflowError),
    /// The ticket was superseded; nothing changed.
    Discarded,
}

/// Sequences submission, matching, and notification for one page instance.
#[derive(Debug)]
pub struct WorkflowController {
    submission: RequestSubmission,
    matching: DonorMatching,
    fanout: NotificationFanout,
    store: SessionStore,
    phase: WorkflowPhase,
    instance: Option<WorkflowInstanceId>,
    search: Option<ResolvedSearch>,
    matches: Option<DonorMatchSet>,
    match_error: Option<String>,
    status: StatusSlot,
}

impl WorkflowController {
    pub fn new(api: Arc<dyn BloodBankApi>, store: SessionStore, config: WorkflowConfig) -> Self {
        Self {
            submission: RequestSubmission::new(api.clone(), store.clone()),
            matching: DonorMatching::new(api.clone()),
            fanout: NotificationFanout::new(api, store.clone()),
            store,
            phase: WorkflowPhase::Idle,
            instance: None,
            search: None,
            matches: None,
            match_error: None,
            status: StatusSlot::new(config.status_display),
        }
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// The matching component, for callers that run queries themselves.
    pub fn matching(&self) -> &DonorMatching {
        &self.matching
    }

    pub fn search(&self) -> Option<&ResolvedSearch> {
        self.search.as_ref()
    }

    pub fn matches(&self) -> Option<&DonorMatchSet> {
        self.matches.as_ref()
    }

    /// Message from the last failed match query, if the current set came
    /// from one.
    pub fn match_error(&self) -> Option<&str> {
        self.match_error.as_deref()
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.current()
    }

    pub fn instance(&self) -> Option<WorkflowInstanceId> {
        self.instance
    }

    fn refuse(&self, action: &'static str) -> WorkflowError {
        WorkflowStateError::InvalidTransition {
            from: self.phase,
            action,
        }
        .into()
    }

    /// Submit a new request, dated today.
    pub async fn submit(&mut self, draft: &BloodRequestDraft) -> Result<Submitted, WorkflowError> {
        self.submit_on(draft, chrono::Local::now().date_naive()).await
    }

    /// Submit a new request. On success the controller moves on to matching
    /// with the request's own blood group and location.
    pub async fn submit_on(
        &mut self,
        draft: &BloodRequestDraft,
        today: NaiveDate,
    ) -> Result<Submitted, WorkflowError> {
        if matches!(
            self.phase,
            WorkflowPhase::Submitting | WorkflowPhase::MatchPending | WorkflowPhase::Notifying
        ) {
            return Err(self.refuse("submit"));
        }

        self.phase = WorkflowPhase::Submitting;
        match self.submission.submit_on(draft, today).await {
            Ok(submitted) => {
                self.begin(ResolvedSearch {
                    parameters: submitted.navigation.clone(),
                    source: ParameterSource::Navigation,
                });
                Ok(submitted)
            }
            Err(err) => {
                self.phase = WorkflowPhase::Idle;
                Err(err)
            }
        }
    }

    /// Enter the matches page. Navigation parameters are used when present,
    /// otherwise the stored request (the resume path).
    pub async fn open_matches(
        &mut self,
        navigation: Option<SearchParameters>,
    ) -> Result<MatchTicket, WorkflowError> {
        if matches!(
            self.phase,
            WorkflowPhase::Submitting | WorkflowPhase::Notifying
        ) {
            return Err(self.refuse("open matches"));
        }
        let resolved = DonorMatching::resolve(navigation, &self.store).await?;
        Ok(self.begin(resolved))
    }

    /// Enter the matches page with user-typed parameters. Neither navigation
    /// nor the stored request is consulted.
    pub fn open_manual(&mut self, params: SearchParameters) -> Result<MatchTicket, WorkflowError> {
        if matches!(
            self.phase,
            WorkflowPhase::Submitting | WorkflowPhase::Notifying
        ) {
            return Err(self.refuse("open matches"));
        }
        self.begin_manual(params)
    }

    /// Search again with user-supplied parameters.
    pub fn research(&mut self, params: SearchParameters) -> Result<MatchTicket, WorkflowError> {
        if matches!(
            self.phase,
            WorkflowPhase::Idle | WorkflowPhase::Submitting | WorkflowPhase::Notifying
        ) {
            return Err(self.refuse("search"));
        }
        self.begin_manual(params)
    }

    fn begin_manual(&mut self, params: SearchParameters) -> Result<MatchTicket, WorkflowError> {
        if !params.is_complete() {
            return Err(WorkflowStateError::NoSearchContext.into());
        }
        Ok(self.begin(ResolvedSearch {
            parameters: params,
            source: ParameterSource::Manual,
        }))
    }

    fn begin(&mut self, search: ResolvedSearch) -> MatchTicket {
        let instance = WorkflowInstanceId::mint();
        debug!(%instance, search = %search.parameters, source = %search.source, "match query started");
        self.phase = WorkflowPhase::MatchPending;
        self.instance = Some(instance);
        self.search = Some(search.clone());
        self.matches = None;
        self.match_error = None;
        MatchTicket { instance, search }
    }

    /// The outstanding match query, if one is pending.
    pub fn pending_ticket(&self) -> Option<MatchTicket> {
        match (self.phase, self.instance, &self.search) {
            (WorkflowPhase::MatchPending, Some(instance), Some(search)) => Some(MatchTicket {
                instance,
                search: search.clone(),
            }),
            _ => None,
        }
    }

    /// Record the answer to a match query.
    ///
    /// Answers for a ticket that is no longer current are discarded.
    pub fn apply_matches(
        &mut self,
        ticket: &MatchTicket,
        result: Result<DonorMatchSet, WorkflowError>,
    ) -> Applied {
        if self.phase != WorkflowPhase::MatchPending || self.instance != Some(ticket.instance) {
            debug!(instance = %ticket.instance, "discarding superseded match result");
            return Applied::Discarded;
        }

        self.phase = WorkflowPhase::MatchReady;
        match result {
            Ok(set) => {
                let count = set.len();
                self.matches = Some(set);
                Applied::Ready(count)
            }
            Err(err) => {
                self.matches = Some(DonorMatchSet::empty(ticket.parameters().clone()));
                self.match_error = Some(err.to_string());
                Applied::Failed(err)
            }
        }
    }

    /// Run the pending match query and apply its result.
    pub async fn load_matches(&mut self) -> Result<&DonorMatchSet, WorkflowError> {
        let Some(ticket) = self.pending_ticket() else {
            return Err(self.refuse("load matches"));
        };
        let result = self.matching.find_matches(ticket.parameters()).await;
        match self.apply_matches(&ticket, result) {
            Applied::Ready(_) => self
                .matches
                .as_ref()
                .ok_or_else(|| WorkflowError::Unexpected("match set missing".into())),
            Applied::Failed(err) => Err(err),
            Applied::Discarded => Err(self.refuse("load matches")),
        }
    }

    /// Whether the notify action is enabled.
    pub fn can_notify(&self) -> bool {
        matches!(
            self.phase,
            WorkflowPhase::MatchReady | WorkflowPhase::NotifyDone
        ) && self
            .matches
            .as_ref()
            .is_some_and(|m| self.fanout.can_notify(m))
    }

    /// Label for the notify action.
    pub fn notify_label(&self) -> String {
        if self.phase == WorkflowPhase::Notifying {
            return "Sending Notifications...".to_owned();
        }
        let n = self.matches.as_ref().map_or(0, DonorMatchSet::len);
        format!("Notify All Donors ({n})")
    }

    /// Notify every current match about the stored request.
    ///
    /// The outcome, success or failure, is also shown in the status slot.
    pub async fn notify(&mut self) -> Result<NotificationOutcome, WorkflowError> {
        match self.phase {
            WorkflowPhase::Notifying => return Err(WorkflowStateError::DispatchInFlight.into()),
            WorkflowPhase::MatchReady | WorkflowPhase::NotifyDone => {}
            _ => return Err(self.refuse("notify")),
        }
        let (Some(search), Some(matches)) = (&self.search, &self.matches) else {
            return Err(WorkflowStateError::NoMatches.into());
        };
        if matches.is_empty() {
            return Err(WorkflowStateError::NoMatches.into());
        }

        self.phase = WorkflowPhase::Notifying;
        let result = self.fanout.notify_all(&search.parameters, matches).await;
        self.phase = WorkflowPhase::NotifyDone;

        match &result {
            Ok(outcome) => self.status.show_success(outcome.message.clone()),
            Err(err) => self.status.show_failure(err.to_string()),
        }
        result
    }

    /// Let time-based transitions catch up: once the notify status has
    /// cleared, the page is ready for another notify.
    pub fn poll(&mut self) -> WorkflowPhase {
        self.status.sweep();
        if self.phase == WorkflowPhase::NotifyDone && !self.status.is_visible() {
            self.phase = WorkflowPhase::MatchReady;
        }
        self.phase
    }
}
