//! Test Helpers

use std::str::FromStr;

use rust_decimal::Decimal;
use zeroize::Zeroizing;

use crate::{
    auth::{AuthService, AuthServiceError, Credentials},
    domain::{
        todos::{
            TodosService, TodosServiceError,
            data::NewTodo,
            records::{TodoId, TodoRecord},
        },
        users::records::{UserRecord, UserUuid},
    },
    test::TestContext,
};

pub(crate) fn credentials(email: &str, password: &str) -> Credentials {
    Credentials {
        email: email.to_string(),
        password: Zeroizing::new(password.to_string()),
    }
}

pub(crate) async fn register_user(
    ctx: &TestContext,
    email: &str,
) -> Result<UserRecord, AuthServiceError> {
    ctx.auth.register(credentials(email, "test-password")).await
}

pub(crate) async fn create_todo(
    ctx: &TestContext,
    user: UserUuid,
    description: &str,
) -> Result<TodoRecord, TodosServiceError> {
    ctx.todos
        .create_todo(
            user,
            NewTodo {
                description: description.to_string(),
            },
        )
        .await
}

/// Overwrite a todo's key directly, bypassing the position engine.
pub(crate) async fn set_position(
    ctx: &TestContext,
    todo: TodoId,
    position: &str,
) -> Result<(), sqlx::Error> {
    let position = Decimal::from_str(position).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

    sqlx::query("UPDATE todos SET position = $2 WHERE id = $1")
        .bind(todo.get())
        .bind(position)
        .execute(ctx.db.pool())
        .await?;

    Ok(())
}
