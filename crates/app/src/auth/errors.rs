//! Auth service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;
use tokio::task::JoinError;

use crate::auth::{BindingError, PasswordError, TokenError};

#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// Unknown email or wrong password. Which one is never revealed.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("email already registered")]
    AlreadyRegistered,

    /// Any failed token or session check.
    #[error("unauthenticated")]
    Unauthenticated,

    #[error("storage error")]
    Sql(#[source] Error),

    #[error("session error")]
    Session(#[source] BindingError),

    #[error("password hashing error")]
    Password(#[from] PasswordError),

    #[error("token signing error")]
    Token(#[source] TokenError),

    #[error("blocking task failed")]
    Join(#[from] JoinError),
}

impl From<Error> for AuthServiceError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyRegistered,
            Some(_) | None => Self::Sql(error),
        }
    }
}

impl From<BindingError> for AuthServiceError {
    fn from(error: BindingError) -> Self {
        match error {
            BindingError::Token(TokenError::Signing(source)) => {
                Self::Token(TokenError::Signing(source))
            }
            BindingError::Store(_) => Self::Session(error),
            BindingError::Token(_) | BindingError::NoSession | BindingError::Mismatch => {
                Self::Unauthenticated
            }
        }
    }
}
