//! Todo Errors

use salvo::http::StatusError;
use tracing::error;

use todo_app::todos::TodosServiceError;

use crate::auth::UNAUTHENTICATED_BRIEF;

pub(crate) fn into_status_error(error: TodosServiceError) -> StatusError {
    match error {
        TodosServiceError::NotFound => StatusError::not_found().brief("Resource not found"),
        TodosServiceError::UnknownOwner => {
            StatusError::unauthorized().brief(UNAUTHENTICATED_BRIEF)
        }
        TodosServiceError::StalePlacement => {
            StatusError::conflict().brief("Todo list changed, reload and retry")
        }
        TodosServiceError::InvalidPlacement => StatusError::bad_request().brief("Invalid request"),
        TodosServiceError::Position(source) => {
            error!("failed to compute todo position: {source}");

            StatusError::internal_server_error()
        }
        TodosServiceError::Sql(source) => {
            error!("todo storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}
