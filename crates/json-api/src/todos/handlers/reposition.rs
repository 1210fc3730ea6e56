//! Reposition Todo Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};

use todo_app::todos::{data::TodoPlacement, records::TodoId};

use crate::{
    extensions::*,
    state::State,
    todos::{errors::into_status_error, models::TodoResponse},
};

/// Reposition Todo Request
///
/// Names the todos that should end up directly before and after the moved
/// one. Omit `prev_id` to move to the start, `next_id` to move to the end.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct RepositionTodoRequest {
    #[serde(default)]
    pub prev_id: Option<i64>,

    #[serde(default)]
    pub next_id: Option<i64>,
}

impl From<RepositionTodoRequest> for TodoPlacement {
    fn from(request: RepositionTodoRequest) -> Self {
        Self {
            prev: request.prev_id.map(TodoId::new),
            next: request.next_id.map(TodoId::new),
        }
    }
}

/// Reposition Todo Handler
///
/// Only the moved todo's position changes. Fails with 409 when the named
/// neighbours are no longer adjacent.
#[endpoint(
    tags("todos"),
    summary = "Reposition Todo",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Todo moved"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid request"),
        (status_code = StatusCode::NOT_FOUND, description = "Resource not found"),
        (status_code = StatusCode::CONFLICT, description = "Todo list changed"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "todos.reposition",
    skip(id, json, depot),
    fields(
        user_uuid = tracing::field::Empty,
        todo_id = tracing::field::Empty,
        prev_id = tracing::field::Empty,
        next_id = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    id: PathParam<i64>,
    json: JsonBody<RepositionTodoRequest>,
    depot: &mut Depot,
) -> Result<Json<TodoResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;
    let todo = TodoId::new(id.into_inner());
    let placement = TodoPlacement::from(json.into_inner());

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user));
    span.record("todo_id", tracing::field::display(todo));

    if let Some(prev) = placement.prev {
        span.record("prev_id", tracing::field::display(prev));
    }

    if let Some(next) = placement.next {
        span.record("next_id", tracing::field::display(next));
    }

    let todo = state
        .app
        .todos
        .reposition_todo(user, todo, placement)
        .await
        .map_err(into_status_error)?;

    tracing::info!(todo_id = %todo.id, position = %todo.position, "moved todo");

    Ok(Json(todo.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use todo_app::todos::{MockTodosService, TodosServiceError};

    use crate::test_helpers::{Mocks, TEST_USER_UUID, authenticated_service, make_todo};

    use super::*;

    fn make_service(todos: MockTodosService) -> Service {
        authenticated_service(
            Mocks::with_todos(todos),
            Router::with_path("todos/{id}/position").patch(handler),
        )
    }

    #[tokio::test]
    async fn test_reposition_between_neighbours() -> TestResult {
        let mut todos = MockTodosService::new();

        todos
            .expect_reposition_todo()
            .once()
            .withf(|user, todo, placement| {
                *user == TEST_USER_UUID
                    && *todo == TodoId::new(3)
                    && *placement
                        == TodoPlacement {
                            prev: Some(TodoId::new(1)),
                            next: Some(TodoId::new(2)),
                        }
            })
            .return_once(|_, _, _| Ok(make_todo(3, "moved", 150)));

        let mut res = TestClient::patch("http://example.com/todos/3/position")
            .json(&json!({ "prev_id": 1, "next_id": 2 }))
            .send(&make_service(todos))
            .await;

        let body: TodoResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.position, "150");

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_body_moves_to_end() -> TestResult {
        let mut todos = MockTodosService::new();

        todos
            .expect_reposition_todo()
            .once()
            .withf(|_, _, placement| *placement == TodoPlacement::default())
            .return_once(|_, _, _| Ok(make_todo(3, "moved", 4096)));

        let res = TestClient::patch("http://example.com/todos/3/position")
            .json(&json!({}))
            .send(&make_service(todos))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    async fn status_for(error: TodosServiceError) -> Option<StatusCode> {
        let mut todos = MockTodosService::new();

        todos
            .expect_reposition_todo()
            .once()
            .return_once(move |_, _, _| Err(error));

        TestClient::patch("http://example.com/todos/3/position")
            .json(&json!({ "prev_id": 1, "next_id": 2 }))
            .send(&make_service(todos))
            .await
            .status_code
    }

    #[tokio::test]
    async fn test_stale_neighbours_return_409() {
        assert_eq!(
            status_for(TodosServiceError::StalePlacement).await,
            Some(StatusCode::CONFLICT)
        );
    }

    #[tokio::test]
    async fn test_placement_next_to_itself_returns_400() {
        assert_eq!(
            status_for(TodosServiceError::InvalidPlacement).await,
            Some(StatusCode::BAD_REQUEST)
        );
    }

    #[tokio::test]
    async fn test_foreign_todo_or_anchor_returns_404() {
        assert_eq!(
            status_for(TodosServiceError::NotFound).await,
            Some(StatusCode::NOT_FOUND)
        );
    }
}
