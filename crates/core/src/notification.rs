use serde::{Deserialize, Serialize};

use crate::request::BloodRequest;
use crate::search::SearchParameters;

/// Payload for the bulk notify call.
///
/// The top-level pair is the *current* search, which may differ from the
/// stored request's own blood group and location after a manual re-search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub blood_group: String,
    pub location: String,
    pub request_details: BloodRequest,
}

impl NotificationRequest {
    #[must_use]
    pub fn new(search: &SearchParameters, request: BloodRequest) -> Self {
        Self {
            blood_group: search.blood_group.clone(),
            location: search.location.clone(),
            request_details: request,
        }
    }

    #[must_use]
    pub fn search(&self) -> SearchParameters {
        SearchParameters::new(self.blood_group.as_str(), self.location.as_str())
    }
}

/// Summary returned by the notification collaborator on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationOutcome {
    /// Human-readable summary, shown verbatim.
    pub message: String,
}
