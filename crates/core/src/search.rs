use std::fmt;

use serde::{Deserialize, Serialize};

use crate::request::BloodRequest;

/// The `(bloodGroup, location)` pair that drives a donor match query.
///
/// Usually taken from the request just submitted, but a manual re-search may
/// broaden it so it no longer equals the stored request's own fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParameters {
    pub blood_group: String,
    pub location: String,
}

impl SearchParameters {
    /// Build parameters, trimming surrounding whitespace from both values.
    pub fn new(blood_group: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            blood_group: blood_group.into().trim().to_owned(),
            location: location.into().trim().to_owned(),
        }
    }

    /// Both values must be non-empty before a query may be issued.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.blood_group.is_empty() && !self.location.is_empty()
    }
}

impl From<&BloodRequest> for SearchParameters {
    fn from(request: &BloodRequest) -> Self {
        Self::new(request.blood_group.as_str(), request.location.as_str())
    }
}

impl fmt::Display for SearchParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}", self.blood_group, self.location)
    }
}
