use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use bloodlink_core::StoredRequest;
use bloodlink_state::error::StateError;
use bloodlink_state::key::SessionId;
use bloodlink_state::store::WorkflowStore;

/// [`WorkflowStore`] that keeps one JSON file per session in a directory.
///
/// Lets separate processes (for example successive CLI invocations) hand
/// the request along the way separate pages do. Writes go to a temporary
/// file that is then renamed over the slot, so readers never observe a
/// partially written entry. Concurrent writers still race: last rename wins.
#[derive(Debug, Clone)]
pub struct FileWorkflowStore {
    dir: PathBuf,
}

impl FileWorkflowStore {
    /// Use `dir` for session files. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `session`'s slot.
    #[must_use]
    pub fn slot_path(&self, session: &SessionId) -> PathBuf {
        self.dir.join(format!("{session}.json"))
    }
}

#[async_trait]
impl WorkflowStore for FileWorkflowStore {
    async fn put(&self, session: &SessionId, entry: &StoredRequest) -> Result<(), StateError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let body = serde_json::to_vec_pretty(entry)?;
        let path = self.slot_path(session);
        let tmp = self
            .dir
            .join(format!(".{session}.{}.tmp", uuid::Uuid::new_v4().simple()));

        tokio::fs::write(&tmp, &body).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        debug!(session = %session, path = %path.display(), "workflow entry stored");
        Ok(())
    }

    async fn get(&self, session: &SessionId) -> Result<Option<StoredRequest>, StateError> {
        let path = self.slot_path(session);
        let body = match tokio::fs::read(&path).await {
            Ok(body) => body,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&body).map(Some).map_err(|e| {
            warn!(session = %session, path = %path.display(), error = %e, "unreadable workflow entry");
            StateError::Serialization(format!("{}: {e}", path.display()))
        })
    }

    async fn clear(&self, session: &SessionId) -> Result<bool, StateError> {
        match tokio::fs::remove_file(self.slot_path(session)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
