//! User bodies.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use todo_app::users::records::UserRecord;

/// Public profile. Never carries the internal id or the password hash.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UserResponse {
    pub user_id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            user_id: user.uuid.into_uuid(),
            email: user.email,
            username: user.username,
            created_at: user.created_at.to_string(),
            updated_at: user.updated_at.to_string(),
        }
    }
}
