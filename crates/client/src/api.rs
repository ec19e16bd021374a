use async_trait::async_trait;
use bloodlink_core::{BloodRequest, Donor, NotificationOutcome, NotificationRequest, SearchParameters};

use crate::error::Error;
use crate::reply::{Acknowledgement, Reply};

/// The three remote collaborators the workflow talks to.
///
/// Implemented over HTTP by [`BloodBankClient`](crate::BloodBankClient) and
/// by [`MockBloodBankApi`](crate::MockBloodBankApi) for tests. Every call is
/// a single attempt: implementations never retry.
#[async_trait]
pub trait BloodBankApi: Send + Sync + std::fmt::Debug {
    /// Register a new blood request with the request-intake collaborator.
    async fn create_request(&self, request: &BloodRequest) -> Result<Reply<Acknowledgement>, Error>;

    /// Ask the donor directory for donors matching `params`.
    ///
    /// An empty list is a valid, accepted answer.
    async fn find_donors(&self, params: &SearchParameters) -> Result<Reply<Vec<Donor>>, Error>;

    /// Ask the notification collaborator to notify every matching donor in
    /// one bulk operation.
    async fn notify_donors(
        &self,
        request: &NotificationRequest,
    ) -> Result<Reply<NotificationOutcome>, Error>;
}
