//! Todos service errors.

use sqlx::Error;
use thiserror::Error;

use crate::domain::todos::positions::PositionError;

#[derive(Debug, Error)]
pub enum TodosServiceError {
    /// No todo with that id belongs to the caller.
    #[error("todo not found")]
    NotFound,

    /// The authenticated user no longer exists.
    #[error("owner not found")]
    UnknownOwner,

    /// The requested neighbours are no longer adjacent.
    #[error("placement no longer matches the list")]
    StalePlacement,

    /// A todo can't be placed next to itself.
    #[error("invalid placement")]
    InvalidPlacement,

    #[error("position error")]
    Position(#[from] PositionError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for TodosServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            Self::NotFound
        } else {
            Self::Sql(error)
        }
    }
}
