use std::sync::Arc;

use bloodlink_core::{BloodRequest, StoredRequest};

use crate::error::StateError;
use crate::key::SessionId;
use crate::store::WorkflowStore;

/// A [`WorkflowStore`] bound to one session.
///
/// This is the handle workflow components receive: one writer (request
/// submission) and any number of readers share it.
#[derive(Debug, Clone)]
pub struct SessionStore {
    backend: Arc<dyn WorkflowStore>,
    session: SessionId,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn WorkflowStore>, session: SessionId) -> Self {
        Self { backend, session }
    }

    #[must_use]
    pub fn session(&self) -> &SessionId {
        &self.session
    }

    /// Capture `request` with the current time and overwrite the slot.
    pub async fn put_request(&self, request: BloodRequest) -> Result<StoredRequest, StateError> {
        let entry = StoredRequest::capture(request);
        self.put(&entry).await?;
        Ok(entry)
    }

    pub async fn put(&self, entry: &StoredRequest) -> Result<(), StateError> {
        self.backend.put(&self.session, entry).await
    }

    pub async fn get(&self) -> Result<Option<StoredRequest>, StateError> {
        self.backend.get(&self.session).await
    }

    pub async fn clear(&self) -> Result<bool, StateError> {
        self.backend.clear(&self.session).await
    }
}
