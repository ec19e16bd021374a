//! In-process stand-in for the collaborators.
//!
//! [`MockBloodBankApi`] answers from scripted outcomes and a small donor
//! directory, and records every call it receives so tests can assert on
//! call counts and payloads.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use bloodlink_core::{BloodRequest, Donor, NotificationOutcome, NotificationRequest, SearchParameters};

use crate::api::BloodBankApi;
use crate::error::Error;
use crate::reply::{Acknowledgement, Rejection, Reply};

/// Summary the mock notification collaborator returns by default.
pub const DEFAULT_NOTIFY_MESSAGE: &str = "Emails sent successfully to donors";

/// A scripted outcome for one collaborator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scripted<T> {
    /// Answer with an accepted reply.
    Accept(T),
    /// Answer with a rejection.
    Reject(Rejection),
    /// Fail as if the collaborator were unreachable.
    Unreachable,
    /// Fail as if the call exceeded the given timeout.
    TimedOut(Duration),
    /// Fail as if the reply could not be decoded.
    Malformed,
}

impl<T: Clone> Scripted<T> {
    fn produce(&self) -> Result<Reply<T>, Error> {
        match self {
            Self::Accept(value) => Ok(Reply::Accepted(value.clone())),
            Self::Reject(rejection) => Ok(Reply::Rejected(rejection.clone())),
            Self::Unreachable => Err(Error::Connection("connection refused".into())),
            Self::TimedOut(after) => Err(Error::Timeout(*after)),
            Self::Malformed => Err(Error::Deserialization("unexpected reply shape".into())),
        }
    }
}

/// A call received by the mock, with the payload it carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    CreateRequest(BloodRequest),
    FindDonors(SearchParameters),
    NotifyDonors(NotificationRequest),
}

#[derive(Debug)]
struct Script {
    create: Scripted<Acknowledgement>,
    // `None` answers from the directory.
    find: Option<Scripted<Vec<Donor>>>,
    find_queue: VecDeque<(Duration, Scripted<Vec<Donor>>)>,
    notify: Scripted<NotificationOutcome>,
    directory: Vec<Donor>,
    latency: Duration,
    calls: Vec<RecordedCall>,
}

/// Scriptable [`BloodBankApi`] for tests.
///
/// By default every create is acknowledged, every notify succeeds, and finds
/// are answered from the donor directory: donors whose blood group and
/// location both match (case-insensitively), in directory order.
#[derive(Debug)]
pub struct MockBloodBankApi {
    script: Mutex<Script>,
}

impl Default for MockBloodBankApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBloodBankApi {
    /// Create a mock that accepts everything and has an empty directory.
    pub fn new() -> Self {
        Self {
            script: Mutex::new(Script {
                create: Scripted::Accept(Acknowledgement::standard()),
                find: None,
                find_queue: VecDeque::new(),
                notify: Scripted::Accept(NotificationOutcome {
                    message: DEFAULT_NOTIFY_MESSAGE.to_owned(),
                }),
                directory: Vec::new(),
                latency: Duration::ZERO,
                calls: Vec::new(),
            }),
        }
    }

    /// Create a mock whose finds are answered from `donors`.
    pub fn with_directory(donors: Vec<Donor>) -> Self {
        let mock = Self::new();
        mock.set_directory(donors);
        mock
    }

    /// Delay every call by `latency` before answering.
    #[must_use]
    pub fn with_latency(self, latency: Duration) -> Self {
        self.lock().latency = latency;
        self
    }

    pub fn set_directory(&self, donors: Vec<Donor>) {
        self.lock().directory = donors;
    }

    pub fn set_create(&self, outcome: Scripted<Acknowledgement>) {
        self.lock().create = outcome;
    }

    /// Override find answers; pass `None` to answer from the directory again.
    pub fn set_find(&self, outcome: Option<Scripted<Vec<Donor>>>) {
        self.lock().find = outcome;
    }

    /// Queue a one-shot find answer delivered after `delay`.
    ///
    /// Queued answers are consumed in order before the standing find script.
    pub fn push_find(&self, delay: Duration, outcome: Scripted<Vec<Donor>>) {
        self.lock().find_queue.push_back((delay, outcome));
    }

    pub fn set_notify(&self, outcome: Scripted<NotificationOutcome>) {
        self.lock().notify = outcome;
    }

    /// Every call received so far, in arrival order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    pub fn create_calls(&self) -> Vec<BloodRequest> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                RecordedCall::CreateRequest(r) => Some(r.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn find_calls(&self) -> Vec<SearchParameters> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                RecordedCall::FindDonors(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn notify_calls(&self) -> Vec<NotificationRequest> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                RecordedCall::NotifyDonors(n) => Some(n.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn search_directory(directory: &[Donor], params: &SearchParameters) -> Vec<Donor> {
        directory
            .iter()
            .filter(|d| {
                d.blood_group.eq_ignore_ascii_case(&params.blood_group)
                    && d.location.eq_ignore_ascii_case(&params.location)
            })
            .cloned()
            .collect()
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl BloodBankApi for MockBloodBankApi {
    async fn create_request(&self, request: &BloodRequest) -> Result<Reply<Acknowledgement>, Error> {
        let (delay, outcome) = {
            let mut script = self.lock();
            script.calls.push(RecordedCall::CreateRequest(request.clone()));
            (script.latency, script.create.clone())
        };
        pause(delay).await;
        outcome.produce()
    }

    async fn find_donors(&self, params: &SearchParameters) -> Result<Reply<Vec<Donor>>, Error> {
        let (delay, outcome) = {
            let mut script = self.lock();
            script.calls.push(RecordedCall::FindDonors(params.clone()));
            if let Some((delay, queued)) = script.find_queue.pop_front() {
                (delay, queued)
            } else {
                let outcome = script.find.clone().unwrap_or_else(|| {
                    Scripted::Accept(Self::search_directory(&script.directory, params))
                });
                (script.latency, outcome)
            }
        };
        pause(delay).await;
        outcome.produce()
    }

    async fn notify_donors(
        &self,
        request: &NotificationRequest,
    ) -> Result<Reply<NotificationOutcome>, Error> {
        let (delay, outcome) = {
            let mut script = self.lock();
            script.calls.push(RecordedCall::NotifyDonors(request.clone()));
            (script.latency, script.notify.clone())
        };
        pause(delay).await;
        outcome.produce()
    }
}
