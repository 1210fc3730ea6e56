//! Todos Data

use crate::domain::todos::records::TodoId;

/// New Todo Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewTodo {
    pub description: String,
}

/// Todo Update Data
#[derive(Debug, Clone, PartialEq)]
pub struct TodoUpdate {
    pub description: String,
    pub completed: bool,
}

/// Target slot for a move, named by the todos that should surround it.
///
/// `prev: None` means the start of the list, `next: None` the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TodoPlacement {
    pub prev: Option<TodoId>,
    pub next: Option<TodoId>,
}
