use bloodlink_core::{NotificationOutcome, NotificationRequest};
use tracing::{info, warn};

use crate::error::Error;
use crate::reply::{Rejection, Reply, text_field};
use crate::BloodBankClient;

impl BloodBankClient {
    /// Ask the collaborator to email every matching donor.
    ///
    /// Uses the longer notify timeout. A success status whose body is not a
    /// JSON object with a `message` string is treated as a rejection.
    pub async fn send_notifications(
        &self,
        request: &NotificationRequest,
    ) -> Result<Reply<NotificationOutcome>, Error> {
        let url = format!("{}/api/NotifyDonors", self.base_url);

        let response = self
            .client
            .post(&url)
            .timeout(self.notify_timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::from_transport(&e, self.notify_timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::from_transport(&e, self.notify_timeout))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "notification collaborator refused the fan-out");
            return Ok(Reply::Rejected(Rejection::from_body(status.as_u16(), &body)));
        }

        match text_field(&body, &["message"]) {
            Some(message) => {
                info!(
                    blood_group = %request.blood_group,
                    location = %request.location,
                    "donors notified"
                );
                Ok(Reply::Accepted(NotificationOutcome { message }))
            }
            None => {
                warn!(status = status.as_u16(), "notify reply carried no message");
                Ok(Reply::Rejected(Rejection::new(status.as_u16(), None)))
            }
        }
    }
}
