//! Todo Records

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::Timestamp;
use rust_decimal::Decimal;

/// Todo identifier, unique across all users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TodoId(i64);

impl TodoId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl Display for TodoId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl From<i64> for TodoId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Todo Record
///
/// The owning user is implied by the call that produced the record and is
/// never carried on it.
#[derive(Debug, Clone, PartialEq)]
pub struct TodoRecord {
    pub id: TodoId,
    pub description: String,
    pub position: Decimal,
    pub completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
