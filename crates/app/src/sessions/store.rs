//! Session store seam.

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;

use crate::sessions::{SessionId, SessionRecord, SessionStoreError};

/// TTL-capable key-value storage for session records.
#[automock]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch a live session record.
    async fn get(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionStoreError>;

    /// Store a session record that expires after `ttl`.
    async fn set(
        &self,
        id: &SessionId,
        record: &SessionRecord,
        ttl: Duration,
    ) -> Result<(), SessionStoreError>;

    /// Remove a session record. Removing a missing record is not an error.
    async fn delete(&self, id: &SessionId) -> Result<(), SessionStoreError>;

    /// Remove `previous` (if any) and store `record` under `id` as one atomic
    /// write: either both happen or neither does.
    async fn replace(
        &self,
        previous: Option<SessionId>,
        id: &SessionId,
        record: &SessionRecord,
        ttl: Duration,
    ) -> Result<(), SessionStoreError>;
}
