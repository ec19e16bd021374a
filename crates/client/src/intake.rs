use bloodlink_core::BloodRequest;
use tracing::{debug, warn};

use crate::error::Error;
use crate::reply::{Acknowledgement, Rejection, Reply};
use crate::BloodBankClient;

impl BloodBankClient {
    /// Register a blood request.
    ///
    /// Only a success status carrying exactly the standard acknowledgement
    /// counts as accepted; any other reply is a rejection.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use bloodlink_client::{BloodBankClient, Reply};
    /// # async fn example(request: bloodlink_core::BloodRequest) -> Result<(), bloodlink_client::Error> {
    /// let client = BloodBankClient::new("http://localhost:8080");
    /// if let Reply::Accepted(ack) = client.submit_request(&request).await? {
    ///     println!("{}", ack.as_str());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn submit_request(
        &self,
        request: &BloodRequest,
    ) -> Result<Reply<Acknowledgement>, Error> {
        let url = format!("{}/api/Requester", self.base_url);

        let response = self
            .client
            .post(&url)
            .timeout(self.request_timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::from_transport(&e, self.request_timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::from_transport(&e, self.request_timeout))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "request intake refused the request");
            return Ok(Reply::Rejected(Rejection::from_message(status.as_u16(), &body)));
        }

        match Acknowledgement::parse(&body) {
            Some(ack) => {
                debug!(blood_group = %request.blood_group, "request registered");
                Ok(Reply::Accepted(ack))
            }
            None => {
                warn!(
                    status = status.as_u16(),
                    body = %body,
                    "request intake answered without the expected acknowledgement"
                );
                Ok(Reply::Rejected(Rejection::new(status.as_u16(), None)))
            }
        }
    }
}
