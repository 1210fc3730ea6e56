//! Todo Domain Concerns

pub mod todos;
pub mod users;
