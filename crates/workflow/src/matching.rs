use std::fmt;
use std::sync::Arc;

use bloodlink_client::{BloodBankApi, Reply};
use bloodlink_core::{DonorMatchSet, SearchParameters};
use bloodlink_state::SessionStore;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{CallSite, FETCH_FAILED, WorkflowError, WorkflowStateError};

/// Where the parameters of a match query came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterSource {
    /// Carried forward from the submission that just happened.
    Navigation,
    /// Read back from the request in the workflow store.
    Stored,
    /// Typed in by the user for a re-search.
    Manual,
}

impl fmt::Display for ParameterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Navigation => "navigation",
            Self::Stored => "stored request",
            Self::Manual => "manual search",
        })
    }
}

/// Search parameters together with their source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSearch {
    pub parameters: SearchParameters,
    pub source: ParameterSource,
}

/// Resolves search parameters and queries the donor directory.
#[derive(Debug, Clone)]
pub struct DonorMatching {
    api: Arc<dyn BloodBankApi>,
}

impl DonorMatching {
    pub fn new(api: Arc<dyn BloodBankApi>) -> Self {
        Self { api }
    }

    /// Pick the parameters for a page visit.
    ///
    /// Complete navigation parameters win. Otherwise the stored request's
    /// blood group and location are used. With neither, the visit has no
    /// search context.
    pub async fn resolve(
        navigation: Option<SearchParameters>,
        store: &SessionStore,
    ) -> Result<ResolvedSearch, WorkflowError> {
        if let Some(parameters) = navigation.filter(SearchParameters::is_complete) {
            return Ok(ResolvedSearch {
                parameters,
                source: ParameterSource::Navigation,
            });
        }

        match store.get().await? {
            Some(entry) => {
                let parameters = SearchParameters::from(&entry.request);
                debug!(search = %parameters, "resuming from stored request");
                Ok(ResolvedSearch {
                    parameters,
                    source: ParameterSource::Stored,
                })
            }
            None => Err(WorkflowStateError::NoSearchContext.into()),
        }
    }

    /// Query the directory. Always a fresh call; an empty set is a success.
    pub async fn find_matches(
        &self,
        params: &SearchParameters,
    ) -> Result<DonorMatchSet, WorkflowError> {
        if !params.is_complete() {
            return Err(WorkflowStateError::NoSearchContext.into());
        }

        let reply = self
            .api
            .find_donors(params)
            .await
            .map_err(|e| WorkflowError::from_client(e, CallSite::Find))?;

        match reply {
            Reply::Accepted(donors) => {
                info!(search = %params, count = donors.len(), "donor matches loaded");
                Ok(DonorMatchSet::new(params.clone(), donors))
            }
            Reply::Rejected(rejection) => {
                warn!(status = rejection.status, search = %params, "donor search refused");
                Err(WorkflowError::Rejected(rejection.message_or(FETCH_FAILED)))
            }
        }
    }
}
