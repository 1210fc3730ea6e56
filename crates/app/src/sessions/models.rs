//! Session Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Server-side session state, stored as JSON under the session key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// External UUID of the user the session is bound to.
    pub user_uuid: Uuid,

    pub created_at: Timestamp,
}
