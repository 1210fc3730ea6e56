//! User Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// User UUID, the only identity handed to clients.
pub type UserUuid = TypedUuid<UserRecord>;

/// Storage-only surrogate key. Never leaves the app crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct UserId(pub(crate) i64);

/// User Record
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    /// External identifier.
    pub uuid: UserUuid,

    /// Unique login email.
    pub email: String,

    /// Display name, unset until the user picks one.
    pub username: Option<String>,

    /// Registration timestamp.
    pub created_at: Timestamp,

    /// Last update timestamp.
    pub updated_at: Timestamp,
}

/// A user row as stored, including the fields that stay server-side.
#[derive(Debug, Clone)]
pub(crate) struct StoredUser {
    pub(crate) id: UserId,
    pub(crate) password_hash: String,
    pub(crate) record: UserRecord,
}
