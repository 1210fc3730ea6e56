//! Result helper extensions for HTTP handlers.

use std::fmt::Display;

use salvo::prelude::StatusError;
use tracing::{debug, error};

/// Map any error to an HTTP error, logging it on the way.
pub(crate) trait ResultExt<T> {
    /// Logged internal server error; `context` never reaches the client.
    fn or_500(self, context: &str) -> Result<T, StatusError>;

    /// Client fault, answered with the generic validation message.
    fn or_400(self, context: &str) -> Result<T, StatusError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Display,
{
    fn or_500(self, context: &str) -> Result<T, StatusError> {
        self.map_err(|error| {
            error!("{context}: {error}");

            StatusError::internal_server_error()
        })
    }

    fn or_400(self, context: &str) -> Result<T, StatusError> {
        self.map_err(|error| {
            debug!("{context}: {error}");

            StatusError::bad_request().brief("Invalid request")
        })
    }
}
