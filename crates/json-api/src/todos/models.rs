//! Todo bodies.

use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use validator::Validate;

use todo_app::todos::records::TodoRecord;

use crate::extensions::*;

/// Todo as seen by its owner. The owning user is implied by the token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TodoResponse {
    pub id: i64,
    pub description: String,

    /// Sort key, as a decimal string so no precision is lost
    pub position: String,

    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<TodoRecord> for TodoResponse {
    fn from(todo: TodoRecord) -> Self {
        Self {
            id: todo.id.get(),
            description: todo.description,
            position: todo.position.normalize().to_string(),
            completed: todo.completed,
            created_at: todo.created_at.to_string(),
            updated_at: todo.updated_at.to_string(),
        }
    }
}

pub(crate) fn into_responses(todos: Vec<TodoRecord>) -> Vec<TodoResponse> {
    todos.into_iter().map(TodoResponse::from).collect()
}

#[derive(Debug, Validate)]
struct Description {
    #[validate(length(min = 1, max = 1000))]
    text: String,
}

/// Trimmed description, rejecting blank or oversized text.
pub(crate) fn validate_description(description: &str) -> Result<String, StatusError> {
    let description = Description {
        text: description.trim().to_owned(),
    };

    description.validate().or_400("invalid todo description")?;

    Ok(description.text)
}
