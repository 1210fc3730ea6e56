//! Users Data

use crate::domain::users::records::UserUuid;

/// New User Data
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NewUser {
    pub uuid: UserUuid,
    pub email: String,
    pub password_hash: String,
}

/// Username Update Data
#[derive(Debug, Clone, PartialEq)]
pub struct UsernameUpdate {
    pub username: String,
}
