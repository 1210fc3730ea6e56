//! Auth data models.

use zeroize::Zeroizing;

use crate::{domain::users::records::UserUuid, sessions::SessionId};

/// Email and plaintext password as submitted by the client.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: Zeroizing<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"**redacted**")
            .finish()
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Login {
    pub user_uuid: UserUuid,
    pub session_id: SessionId,
    pub access_token: String,
}
