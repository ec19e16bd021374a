use bloodlink_core::{Donor, SearchParameters};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::{debug, warn};

use crate::error::Error;
use crate::reply::{Rejection, Reply};
use crate::BloodBankClient;

impl BloodBankClient {
    /// List donors for a blood group and location.
    ///
    /// Both values travel as path segments, so `A+` is sent as `A%2B`.
    pub async fn list_donors(&self, params: &SearchParameters) -> Result<Reply<Vec<Donor>>, Error> {
        let url = self.donor_list_url(params);

        let response = self
            .client
            .get(&url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| Error::from_transport(&e, self.request_timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::from_transport(&e, self.request_timeout))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), search = %params, "donor directory refused the search");
            return Ok(Reply::Rejected(Rejection::from_body(status.as_u16(), &body)));
        }

        let donors: Vec<Donor> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization(e.to_string()))?;
        debug!(search = %params, count = donors.len(), "donor directory answered");
        Ok(Reply::Accepted(donors))
    }

    pub(crate) fn donor_list_url(&self, params: &SearchParameters) -> String {
        format!(
            "{}/api/DonorList/{}/{}",
            self.base_url,
            utf8_percent_encode(&params.blood_group, NON_ALPHANUMERIC),
            utf8_percent_encode(&params.location, NON_ALPHANUMERIC),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_segments_are_encoded() {
        let client = BloodBankClient::new("http://bank.local/");
        let url = client.donor_list_url(&SearchParameters::new("AB+", "New Delhi/South"));
        assert_eq!(url, "http://bank.local/api/DonorList/AB%2B/New%20Delhi%2FSouth");
    }

    #[test]
    fn plain_segments_pass_through() {
        let client = BloodBankClient::new("http://bank.local");
        let url = client.donor_list_url(&SearchParameters::new("O", "Chennai"));
        assert_eq!(url, "http://bank.local/api/DonorList/O/Chennai");
    }
}
