//! Session identifiers.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use rand::{RngCore, rngs::OsRng};
use thiserror::Error;

/// Number of random bytes behind a session identifier.
pub const SESSION_ID_BYTES: usize = 32;

const SESSION_ID_HEX_CHARS: usize = SESSION_ID_BYTES * 2;

const KEY_PREFIX: &str = "session:";

/// Opaque, unguessable session identifier carried in the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("session id format is invalid")]
pub struct SessionIdError;

impl SessionId {
    /// Draw a fresh identifier from the OS random source.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0_u8; SESSION_ID_BYTES];

        OsRng.fill_bytes(&mut bytes);

        Self(hex::encode(bytes))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key under which the session record is stored.
    #[must_use]
    pub fn store_key(&self) -> String {
        format!("{KEY_PREFIX}{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = SessionIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0_u8; SESSION_ID_BYTES];

        if hex::decode_to_slice(value, &mut bytes).is_err() {
            return Err(SessionIdError);
        }

        // Only the lowercase form is ever issued.
        let id = hex::encode(bytes);

        if id == value {
            Ok(Self(id))
        } else {
            Err(SessionIdError)
        }
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}
