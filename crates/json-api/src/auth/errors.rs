//! Auth Errors

use salvo::http::StatusError;
use tracing::error;

use todo_app::auth::AuthServiceError;

/// Brief used for every rejected token or session, whatever the cause.
pub(crate) const UNAUTHENTICATED_BRIEF: &str = "Invalid or expired token";

pub(crate) fn into_status_error(error: AuthServiceError) -> StatusError {
    match error {
        AuthServiceError::InvalidCredentials => {
            StatusError::unauthorized().brief("Invalid email or password")
        }
        AuthServiceError::AlreadyRegistered => {
            StatusError::conflict().brief("User already registered")
        }
        AuthServiceError::Unauthenticated => StatusError::unauthorized().brief(UNAUTHENTICATED_BRIEF),
        AuthServiceError::Sql(source) => {
            error!("auth storage failure: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Session(source) => {
            error!("session store failure: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Password(source) => {
            error!("password hashing failure: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Token(source) => {
            error!("token signing failure: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Join(source) => {
            error!("password task failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
