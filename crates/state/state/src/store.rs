use async_trait::async_trait;
use bloodlink_core::StoredRequest;

use crate::error::StateError;
use crate::key::SessionId;

/// Trait for the session-scoped workflow store.
///
/// Every session holds at most one [`StoredRequest`]. Writes overwrite the
/// previous entry unconditionally: there is no merge and no locking, so two
/// writers sharing a session race and the last write wins.
#[async_trait]
pub trait WorkflowStore: Send + Sync + std::fmt::Debug {
    /// Replace the session's entry.
    async fn put(&self, session: &SessionId, entry: &StoredRequest) -> Result<(), StateError>;

    /// Read the session's entry, if any.
    async fn get(&self, session: &SessionId) -> Result<Option<StoredRequest>, StateError>;

    /// Remove the session's entry. Returns `true` if one existed.
    async fn clear(&self, session: &SessionId) -> Result<bool, StateError>;
}
