use std::sync::Arc;

use bloodlink_client::{Acknowledgement, BloodBankApi, Reply};
use bloodlink_core::{BloodRequestDraft, DraftField, SearchParameters, StoredRequest, ValidationErrors};
use bloodlink_state::SessionStore;
use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::error::{CallSite, REGISTRATION_FAILED, REQUEST_FAILED, WorkflowError};

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    /// What was written to the workflow store.
    pub entry: StoredRequest,
    /// Parameters carried forward to donor matching.
    pub navigation: SearchParameters,
    pub acknowledgement: Acknowledgement,
}

/// Validates a draft, registers it remotely, and seeds the workflow store.
#[derive(Debug, Clone)]
pub struct RequestSubmission {
    api: Arc<dyn BloodBankApi>,
    store: SessionStore,
}

impl RequestSubmission {
    pub fn new(api: Arc<dyn BloodBankApi>, store: SessionStore) -> Self {
        Self { api, store }
    }

    /// Submit `draft`, stamping it with the local calendar date.
    pub async fn submit(&self, draft: &BloodRequestDraft) -> Result<Submitted, WorkflowError> {
        self.submit_on(draft, chrono::Local::now().date_naive()).await
    }

    /// Submit `draft` as if today were `today`.
    ///
    /// Invalid drafts fail before any network call. The store is written only
    /// after the collaborator acknowledges the request.
    pub async fn submit_on(
        &self,
        draft: &BloodRequestDraft,
        today: NaiveDate,
    ) -> Result<Submitted, WorkflowError> {
        let request = draft.validate(today).map_err(|errors| {
            debug!(fields = errors.len(), "draft failed validation");
            WorkflowError::Validation(errors)
        })?;

        let reply = self
            .api
            .create_request(&request)
            .await
            .map_err(|e| WorkflowError::from_client(e, CallSite::Create))?;

        let acknowledgement = match reply {
            Reply::Accepted(ack) => ack,
            Reply::Rejected(rejection) => {
                warn!(status = rejection.status, "blood request was not registered");
                let fallback = if (200..300).contains(&rejection.status) {
                    REGISTRATION_FAILED
                } else {
                    REQUEST_FAILED
                };
                return Err(WorkflowError::Rejected(rejection.message_or(fallback)));
            }
        };

        let navigation = SearchParameters::from(&request);
        let entry = self.store.put_request(request).await?;
        info!(
            session = %self.store.session(),
            search = %navigation,
            "blood request registered"
        );

        Ok(Submitted {
            entry,
            navigation,
            acknowledgement,
        })
    }
}

/// A request form being filled in: the raw draft plus its current errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestForm {
    draft: BloodRequestDraft,
    errors: ValidationErrors,
}

impl RequestForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_draft(draft: BloodRequestDraft) -> Self {
        Self {
            draft,
            errors: ValidationErrors::new(),
        }
    }

    pub fn draft(&self) -> &BloodRequestDraft {
        &self.draft
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Edit one field. Any error recorded for that field is cleared.
    pub fn edit(&mut self, field: DraftField, value: impl Into<String>) {
        self.draft.set(field, value);
        self.errors.clear(field);
    }

    /// Record the field errors from a failed submission. Other failures leave
    /// the form untouched.
    pub fn absorb(&mut self, error: &WorkflowError) {
        if let Some(errors) = error.validation() {
            self.errors = errors.clone();
        }
    }

    /// Start over with a blank form.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editing_clears_only_that_field() {
        let mut form = RequestForm::new();
        let mut errors = ValidationErrors::new();
        errors.insert(DraftField::RequesterPhone, "Valid 10-digit phone number required");
        errors.insert(DraftField::Location, "Location required");
        form.absorb(&WorkflowError::Validation(errors));
        assert_eq!(form.errors().len(), 2);

        form.edit(DraftField::RequesterPhone, "9876543210");
        assert!(!form.errors().contains(DraftField::RequesterPhone));
        assert!(form.errors().contains(DraftField::Location));
        assert_eq!(form.draft().get(DraftField::RequesterPhone), "9876543210");
    }

    #[test]
    fn non_validation_failures_keep_errors() {
        let mut form = RequestForm::new();
        form.absorb(&WorkflowError::Rejected("Registration failed".into()));
        assert!(form.errors().is_empty());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut form = RequestForm::new();
        form.edit(DraftField::UnitsRequired, "4");
        form.reset();
        assert_eq!(form.draft().get(DraftField::UnitsRequired), "1");
    }
}
