//! Password hashing.

use argon2::{
    Argon2,
    password_hash::{
        Error as HashError, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
    },
};
use mockall::automock;
use rand::{RngCore, rngs::OsRng};
use thiserror::Error;

const SALT_BYTES: usize = 16;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to hash password")]
    Hash(#[source] HashError),

    #[error("stored password hash is malformed")]
    MalformedHash(#[source] HashError),
}

/// One-way, salted password hashing.
///
/// Both operations are CPU-bound; async callers run them on the blocking pool.
#[automock]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` with a fresh salt into a self-describing PHC string.
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Check `password` against a hash produced by [`PasswordHasher::hash`].
    fn verify(&self, hash: &str, password: &str) -> Result<bool, PasswordError>;
}

/// Argon2id with the crate's default cost parameters.
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let mut salt_bytes = [0_u8; SALT_BYTES];

        OsRng.fill_bytes(&mut salt_bytes);

        let salt = SaltString::encode_b64(&salt_bytes).map_err(PasswordError::Hash)?;

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(PasswordError::Hash)
    }

    fn verify(&self, hash: &str, password: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(hash).map_err(PasswordError::MalformedHash)?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(error) => Err(PasswordError::MalformedHash(error)),
        }
    }
}
