//! Todos Repository
//!
//! Every statement is scoped by the owning user's storage id.

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::domain::{
    todos::{
        positions::STEP,
        records::{TodoId, TodoRecord},
    },
    users::records::UserId,
};

const CREATE_TODO_SQL: &str = include_str!("sql/create_todo.sql");
const LAST_POSITION_SQL: &str = include_str!("sql/last_position.sql");
const LIST_TODOS_SQL: &str = include_str!("sql/list_todos.sql");
const SEARCH_TODOS_SQL: &str = include_str!("sql/search_todos.sql");
const GET_TODO_SQL: &str = include_str!("sql/get_todo.sql");
const UPDATE_TODO_SQL: &str = include_str!("sql/update_todo.sql");
const UPDATE_POSITION_SQL: &str = include_str!("sql/update_position.sql");
const NEXT_AFTER_SQL: &str = include_str!("sql/next_after.sql");
const RENUMBER_TODOS_SQL: &str = include_str!("sql/renumber_todos.sql");
const DELETE_TODO_SQL: &str = include_str!("sql/delete_todo.sql");

/// A todo's id and key, enough to reason about its neighbours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Slot {
    pub(crate) id: TodoId,
    pub(crate) position: Decimal,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgTodosRepository;

impl PgTodosRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_todo(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserId,
        description: &str,
        position: Decimal,
    ) -> Result<TodoRecord, sqlx::Error> {
        query_as::<Postgres, TodoRecord>(CREATE_TODO_SQL)
            .bind(owner.0)
            .bind(description)
            .bind(position)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn last_position(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserId,
    ) -> Result<Option<Decimal>, sqlx::Error> {
        query_scalar(LAST_POSITION_SQL)
            .bind(owner.0)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_todos(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserId,
    ) -> Result<Vec<TodoRecord>, sqlx::Error> {
        query_as::<Postgres, TodoRecord>(LIST_TODOS_SQL)
            .bind(owner.0)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn search_todos(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserId,
        keyword: &str,
    ) -> Result<Vec<TodoRecord>, sqlx::Error> {
        query_as::<Postgres, TodoRecord>(SEARCH_TODOS_SQL)
            .bind(owner.0)
            .bind(keyword)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_todo(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserId,
        todo: TodoId,
    ) -> Result<Option<TodoRecord>, sqlx::Error> {
        query_as::<Postgres, TodoRecord>(GET_TODO_SQL)
            .bind(todo.get())
            .bind(owner.0)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn update_todo(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserId,
        todo: TodoId,
        description: &str,
        completed: bool,
    ) -> Result<Option<TodoRecord>, sqlx::Error> {
        query_as::<Postgres, TodoRecord>(UPDATE_TODO_SQL)
            .bind(todo.get())
            .bind(owner.0)
            .bind(description)
            .bind(completed)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn update_position(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserId,
        todo: TodoId,
        position: Decimal,
    ) -> Result<Option<TodoRecord>, sqlx::Error> {
        query_as::<Postgres, TodoRecord>(UPDATE_POSITION_SQL)
            .bind(todo.get())
            .bind(owner.0)
            .bind(position)
            .fetch_optional(&mut **tx)
            .await
    }

    /// First todo after `after` in list order, skipping `excluding`.
    /// `after: None` starts from the head of the list.
    pub(crate) async fn next_after(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserId,
        excluding: TodoId,
        after: Option<Decimal>,
    ) -> Result<Option<Slot>, sqlx::Error> {
        query_as::<Postgres, Slot>(NEXT_AFTER_SQL)
            .bind(owner.0)
            .bind(excluding.get())
            .bind(after)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Respace every key of the owner's list to multiples of [`STEP`],
    /// keeping the current order.
    pub(crate) async fn renumber_todos(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(RENUMBER_TODOS_SQL)
            .bind(owner.0)
            .bind(Decimal::from(STEP))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_todo(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserId,
        todo: TodoId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_TODO_SQL)
            .bind(todo.get())
            .bind(owner.0)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for TodoRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: TodoId::new(row.try_get("id")?),
            description: row.try_get("description")?,
            position: row.try_get("position")?,
            completed: row.try_get("completed")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Slot {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: TodoId::new(row.try_get("id")?),
            position: row.try_get("position")?,
        })
    }
}
