use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use bloodlink_core::StoredRequest;
use bloodlink_state::error::StateError;
use bloodlink_state::key::SessionId;
use bloodlink_state::store::WorkflowStore;

/// A single slot in the in-memory store.
#[derive(Debug, Clone)]
struct Entry {
    value: StoredRequest,
    /// Number of writes this slot has seen.
    writes: u64,
}

/// In-memory [`WorkflowStore`] backed by a [`DashMap`].
///
/// Entries live as long as the store: there is no expiry beyond the life of
/// the process. This implementation is fully synchronous internally; the
/// async trait methods return immediately.
#[derive(Debug, Default)]
pub struct MemoryWorkflowStore {
    data: DashMap<SessionId, Entry>,
}

impl MemoryWorkflowStore {
    /// Create a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the session's slot has been written, `0` if never.
    pub fn write_count(&self, session: &SessionId) -> u64 {
        self.data.get(session).map_or(0, |entry| entry.writes)
    }
}

#[async_trait]
impl WorkflowStore for MemoryWorkflowStore {
    async fn put(&self, session: &SessionId, entry: &StoredRequest) -> Result<(), StateError> {
        let slot = self
            .data
            .entry(session.clone())
            .and_modify(|slot| {
                slot.value = entry.clone();
                slot.writes += 1;
            })
            .or_insert_with(|| Entry {
                value: entry.clone(),
                writes: 1,
            });
        debug!(session = %session, writes = slot.writes, "workflow entry stored");
        Ok(())
    }

    async fn get(&self, session: &SessionId) -> Result<Option<StoredRequest>, StateError> {
        Ok(self.data.get(session).map(|entry| entry.value.clone()))
    }

    async fn clear(&self, session: &SessionId) -> Result<bool, StateError> {
        Ok(self.data.remove(session).is_some())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bloodlink_state::SessionStore;
    use bloodlink_state::testing::{run_store_conformance_tests, sample_entry};

    use super::*;

    #[tokio::test]
    async fn conformance() {
        let store = MemoryWorkflowStore::new();
        run_store_conformance_tests(&store)
            .await
            .expect("conformance tests should pass");
    }

    #[tokio::test]
    async fn write_count_tracks_overwrites() {
        let store = MemoryWorkflowStore::new();
        let session = SessionId::default();
        assert_eq!(store.write_count(&session), 0);

        store.put(&session, &sample_entry("Chennai")).await.unwrap();
        store.put(&session, &sample_entry("Madurai")).await.unwrap();
        assert_eq!(store.write_count(&session), 2);
    }

    #[tokio::test]
    async fn session_handles_share_the_backend() {
        let backend = Arc::new(MemoryWorkflowStore::new());
        let writer = SessionStore::new(backend.clone(), SessionId::default());
        let reader = SessionStore::new(backend, SessionId::default());

        let stored = writer
            .put_request(sample_entry("Chennai").request)
            .await
            .unwrap();
        assert_eq!(reader.get().await.unwrap(), Some(stored));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writers_leave_one_complete_entry() {
        let store = Arc::new(MemoryWorkflowStore::new());
        let session = SessionId::default();
        let locations = ["Chennai", "Madurai", "Vellore", "Salem"];

        let mut handles = Vec::new();
        for location in locations {
            let store = store.clone();
            let session = session.clone();
            handles.push(tokio::spawn(async move {
                store.put(&session, &sample_entry(location)).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // Last write wins: whichever writer ran last, the slot holds one of
        // the complete entries, never a blend.
        let entry = store.get(&session).await.unwrap().unwrap();
        assert!(locations.contains(&entry.request.location.as_str()));
        assert_eq!(entry, sample_entry(&entry.request.location));
        assert_eq!(store.write_count(&session), 4);
    }
}
