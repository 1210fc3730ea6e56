//! Todos service.

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use sqlx::{Postgres, Transaction};
use tracing::{debug, info};

use crate::{
    database::Db,
    domain::{
        todos::{
            data::{NewTodo, TodoPlacement, TodoUpdate},
            errors::TodosServiceError,
            positions::{self, PositionError},
            records::{TodoId, TodoRecord},
            repository::PgTodosRepository,
        },
        users::{
            records::{UserId, UserUuid},
            repository::PgUsersRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgTodosService {
    db: Db,
    users: PgUsersRepository,
    todos: PgTodosRepository,
}

impl PgTodosService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            users: PgUsersRepository::new(),
            todos: PgTodosRepository::new(),
        }
    }

    async fn owner(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<UserId, TodosServiceError> {
        self.users
            .find_user_id(tx, user)
            .await?
            .ok_or(TodosServiceError::UnknownOwner)
    }

    /// Resolve the owner and hold their row lock for the rest of `tx`, so
    /// list mutations for one user are applied one at a time.
    async fn lock_owner(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<UserId, TodosServiceError> {
        self.users
            .lock_user_id(tx, user)
            .await?
            .ok_or(TodosServiceError::UnknownOwner)
    }

    async fn append_position(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserId,
    ) -> Result<Decimal, TodosServiceError> {
        let last = self.todos.last_position(tx, owner).await?;

        Ok(positions::append(last)?)
    }

    /// Key for `todo` in the slot described by `placement`, read from the
    /// stored list rather than trusted from the client.
    async fn placement_position(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserId,
        todo: TodoId,
        placement: TodoPlacement,
    ) -> Result<Decimal, TodosServiceError> {
        let prev = match placement.prev {
            Some(prev) => Some(
                self.todos
                    .get_todo(tx, owner, prev)
                    .await?
                    .ok_or(TodosServiceError::NotFound)?
                    .position,
            ),
            None => None,
        };

        let successor = self.todos.next_after(tx, owner, todo, prev).await?;

        if successor.map(|slot| slot.id) != placement.next {
            return Err(TodosServiceError::StalePlacement);
        }

        Ok(positions::between(prev, successor.map(|slot| slot.position))?)
    }

    async fn renumber(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserId,
    ) -> Result<(), TodosServiceError> {
        let renumbered = self.todos.renumber_todos(tx, owner).await?;

        debug!(renumbered, "renumbered todo positions");

        Ok(())
    }
}

#[async_trait]
impl TodosService for PgTodosService {
    #[tracing::instrument(
        name = "todos.service.create_todo",
        skip(self, todo),
        fields(user_uuid = %user),
        err
    )]
    async fn create_todo(
        &self,
        user: UserUuid,
        todo: NewTodo,
    ) -> Result<TodoRecord, TodosServiceError> {
        let mut tx = self.db.begin().await?;

        let owner = self.lock_owner(&mut tx, user).await?;

        let position = match self.append_position(&mut tx, owner).await {
            Err(TodosServiceError::Position(PositionError::Exhausted)) => {
                self.renumber(&mut tx, owner).await?;
                self.append_position(&mut tx, owner).await?
            }
            result => result?,
        };

        let created = self
            .todos
            .create_todo(&mut tx, owner, &todo.description, position)
            .await?;

        tx.commit().await?;

        info!(todo_id = %created.id, "created todo");

        Ok(created)
    }

    async fn list_todos(&self, user: UserUuid) -> Result<Vec<TodoRecord>, TodosServiceError> {
        let mut tx = self.db.begin().await?;

        let owner = self.owner(&mut tx, user).await?;

        let todos = self.todos.list_todos(&mut tx, owner).await?;

        tx.commit().await?;

        Ok(todos)
    }

    async fn search_todos(
        &self,
        user: UserUuid,
        keyword: &str,
    ) -> Result<Vec<TodoRecord>, TodosServiceError> {
        let mut tx = self.db.begin().await?;

        let owner = self.owner(&mut tx, user).await?;

        let todos = self.todos.search_todos(&mut tx, owner, keyword).await?;

        tx.commit().await?;

        Ok(todos)
    }

    async fn update_todo(
        &self,
        user: UserUuid,
        todo: TodoId,
        update: TodoUpdate,
    ) -> Result<TodoRecord, TodosServiceError> {
        let mut tx = self.db.begin().await?;

        let owner = self.owner(&mut tx, user).await?;

        let updated = self
            .todos
            .update_todo(
                &mut tx,
                owner,
                todo,
                &update.description,
                update.completed,
            )
            .await?
            .ok_or(TodosServiceError::NotFound)?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "todos.service.reposition_todo",
        skip(self),
        fields(user_uuid = %user, todo_id = %todo),
        err
    )]
    async fn reposition_todo(
        &self,
        user: UserUuid,
        todo: TodoId,
        placement: TodoPlacement,
    ) -> Result<TodoRecord, TodosServiceError> {
        let beside_itself = placement.prev == Some(todo) || placement.next == Some(todo);
        let same_neighbour = placement.prev.is_some() && placement.prev == placement.next;

        if beside_itself || same_neighbour {
            return Err(TodosServiceError::InvalidPlacement);
        }

        let mut tx = self.db.begin().await?;

        let owner = self.lock_owner(&mut tx, user).await?;

        self.todos
            .get_todo(&mut tx, owner, todo)
            .await?
            .ok_or(TodosServiceError::NotFound)?;

        if let Some(next) = placement.next {
            self.todos
                .get_todo(&mut tx, owner, next)
                .await?
                .ok_or(TodosServiceError::NotFound)?;
        }

        let position = match self
            .placement_position(&mut tx, owner, todo, placement)
            .await
        {
            Err(TodosServiceError::Position(PositionError::Exhausted)) => {
                self.renumber(&mut tx, owner).await?;
                self.placement_position(&mut tx, owner, todo, placement)
                    .await?
            }
            result => result?,
        };

        let moved = self
            .todos
            .update_position(&mut tx, owner, todo, position)
            .await?
            .ok_or(TodosServiceError::NotFound)?;

        tx.commit().await?;

        debug!(%position, "moved todo");

        Ok(moved)
    }

    async fn delete_todo(&self, user: UserUuid, todo: TodoId) -> Result<(), TodosServiceError> {
        let mut tx = self.db.begin().await?;

        let owner = self.owner(&mut tx, user).await?;

        let rows_affected = self.todos.delete_todo(&mut tx, owner, todo).await?;

        if rows_affected == 0 {
            return Err(TodosServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait TodosService: Send + Sync {
    /// Append a todo to the end of the user's list.
    async fn create_todo(
        &self,
        user: UserUuid,
        todo: NewTodo,
    ) -> Result<TodoRecord, TodosServiceError>;

    /// All of the user's todos in list order.
    async fn list_todos(&self, user: UserUuid) -> Result<Vec<TodoRecord>, TodosServiceError>;

    /// The user's todos whose description matches `keyword`, in list order.
    async fn search_todos(
        &self,
        user: UserUuid,
        keyword: &str,
    ) -> Result<Vec<TodoRecord>, TodosServiceError>;

    /// Replace a todo's description and completion flag.
    async fn update_todo(
        &self,
        user: UserUuid,
        todo: TodoId,
        update: TodoUpdate,
    ) -> Result<TodoRecord, TodosServiceError>;

    /// Move a todo between two neighbours. Only the moved todo's key changes
    /// unless the list has to be renumbered first.
    async fn reposition_todo(
        &self,
        user: UserUuid,
        todo: TodoId,
        placement: TodoPlacement,
    ) -> Result<TodoRecord, TodosServiceError>;

    /// Delete one of the user's todos.
    async fn delete_todo(&self, user: UserUuid, todo: TodoId) -> Result<(), TodosServiceError>;
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use testresult::TestResult;

    use crate::test::{
        TestContext,
        helpers::{create_todo, register_user, set_position},
    };

    use super::*;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap_or_default()
    }

    fn ids(todos: &[TodoRecord]) -> Vec<TodoId> {
        todos.iter().map(|todo| todo.id).collect()
    }

    #[tokio::test]
    async fn create_todo_appends_with_increasing_positions() -> TestResult {
        let ctx = TestContext::new().await;
        let user = register_user(&ctx, "alice@example.com").await?;

        let first = create_todo(&ctx, user.uuid, "first").await?;
        let second = create_todo(&ctx, user.uuid, "second").await?;
        let third = create_todo(&ctx, user.uuid, "third").await?;

        assert_eq!(first.position, Decimal::from(positions::FIRST));
        assert!(first.position < second.position);
        assert!(second.position < third.position);
        assert!(!first.completed);

        Ok(())
    }

    #[tokio::test]
    async fn create_todo_for_deleted_user_is_unknown_owner() {
        let ctx = TestContext::new().await;

        let result = ctx
            .todos
            .create_todo(
                UserUuid::new(),
                NewTodo {
                    description: "orphan".to_string(),
                },
            )
            .await;

        assert!(
            matches!(result, Err(TodosServiceError::UnknownOwner)),
            "expected UnknownOwner, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_todos_returns_only_own_todos_in_order() -> TestResult {
        let ctx = TestContext::new().await;
        let alice = register_user(&ctx, "alice@example.com").await?;
        let bob = register_user(&ctx, "bob@example.com").await?;

        let a = create_todo(&ctx, alice.uuid, "a").await?;
        create_todo(&ctx, bob.uuid, "not alice's").await?;
        let b = create_todo(&ctx, alice.uuid, "b").await?;

        set_position(&ctx, a.id, "5000").await?;

        let todos = ctx.todos.list_todos(alice.uuid).await?;

        assert_eq!(ids(&todos), vec![b.id, a.id]);

        Ok(())
    }

    #[tokio::test]
    async fn search_todos_matches_keyword_within_owner() -> TestResult {
        let ctx = TestContext::new().await;
        let alice = register_user(&ctx, "alice@example.com").await?;
        let bob = register_user(&ctx, "bob@example.com").await?;

        let milk = create_todo(&ctx, alice.uuid, "buy milk").await?;
        create_todo(&ctx, alice.uuid, "walk the dog").await?;
        create_todo(&ctx, bob.uuid, "buy milk too").await?;

        let found = ctx.todos.search_todos(alice.uuid, "milk").await?;

        assert_eq!(ids(&found), vec![milk.id]);

        Ok(())
    }

    #[tokio::test]
    async fn update_todo_changes_fields_but_not_position() -> TestResult {
        let ctx = TestContext::new().await;
        let user = register_user(&ctx, "alice@example.com").await?;
        let todo = create_todo(&ctx, user.uuid, "draft").await?;

        let updated = ctx
            .todos
            .update_todo(
                user.uuid,
                todo.id,
                TodoUpdate {
                    description: "final".to_string(),
                    completed: true,
                },
            )
            .await?;

        assert_eq!(updated.description, "final");
        assert!(updated.completed);
        assert_eq!(updated.position, todo.position);

        Ok(())
    }

    #[tokio::test]
    async fn update_todo_of_other_user_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let alice = register_user(&ctx, "alice@example.com").await?;
        let mallory = register_user(&ctx, "mallory@example.com").await?;
        let todo = create_todo(&ctx, alice.uuid, "private").await?;

        let result = ctx
            .todos
            .update_todo(
                mallory.uuid,
                todo.id,
                TodoUpdate {
                    description: "owned".to_string(),
                    completed: true,
                },
            )
            .await;

        assert!(
            matches!(result, Err(TodosServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        let todos = ctx.todos.list_todos(alice.uuid).await?;

        assert_eq!(todos, vec![todo]);

        Ok(())
    }

    #[tokio::test]
    async fn delete_todo_removes_only_target() -> TestResult {
        let ctx = TestContext::new().await;
        let user = register_user(&ctx, "alice@example.com").await?;
        let keep = create_todo(&ctx, user.uuid, "keep").await?;
        let drop = create_todo(&ctx, user.uuid, "drop").await?;

        ctx.todos.delete_todo(user.uuid, drop.id).await?;

        let todos = ctx.todos.list_todos(user.uuid).await?;

        assert_eq!(ids(&todos), vec![keep.id]);

        Ok(())
    }

    #[tokio::test]
    async fn delete_todo_of_other_user_or_missing_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let alice = register_user(&ctx, "alice@example.com").await?;
        let mallory = register_user(&ctx, "mallory@example.com").await?;
        let todo = create_todo(&ctx, alice.uuid, "private").await?;

        let foreign = ctx.todos.delete_todo(mallory.uuid, todo.id).await;
        let missing = ctx.todos.delete_todo(alice.uuid, TodoId::new(1000)).await;

        assert!(
            matches!(foreign, Err(TodosServiceError::NotFound)),
            "expected NotFound, got {foreign:?}"
        );
        assert!(
            matches!(missing, Err(TodosServiceError::NotFound)),
            "expected NotFound, got {missing:?}"
        );
        assert_eq!(ctx.todos.list_todos(alice.uuid).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn reposition_between_100_and_200_lands_on_150() -> TestResult {
        let ctx = TestContext::new().await;
        let user = register_user(&ctx, "alice@example.com").await?;

        let a = create_todo(&ctx, user.uuid, "a").await?;
        let b = create_todo(&ctx, user.uuid, "b").await?;
        let c = create_todo(&ctx, user.uuid, "c").await?;

        set_position(&ctx, a.id, "100").await?;
        set_position(&ctx, b.id, "200").await?;

        let moved = ctx
            .todos
            .reposition_todo(
                user.uuid,
                c.id,
                TodoPlacement {
                    prev: Some(a.id),
                    next: Some(b.id),
                },
            )
            .await?;

        assert_eq!(moved.position, Decimal::from(150));

        let todos = ctx.todos.list_todos(user.uuid).await?;

        assert_eq!(ids(&todos), vec![a.id, c.id, b.id]);
        assert_eq!(todos.first().map(|t| t.position), Some(Decimal::from(100)));
        assert_eq!(todos.last().map(|t| t.position), Some(Decimal::from(200)));

        Ok(())
    }

    #[tokio::test]
    async fn reposition_to_start_and_end_of_list() -> TestResult {
        let ctx = TestContext::new().await;
        let user = register_user(&ctx, "alice@example.com").await?;

        let a = create_todo(&ctx, user.uuid, "a").await?;
        let b = create_todo(&ctx, user.uuid, "b").await?;
        let c = create_todo(&ctx, user.uuid, "c").await?;

        ctx.todos
            .reposition_todo(
                user.uuid,
                c.id,
                TodoPlacement {
                    prev: None,
                    next: Some(a.id),
                },
            )
            .await?;

        assert_eq!(
            ids(&ctx.todos.list_todos(user.uuid).await?),
            vec![c.id, a.id, b.id]
        );

        ctx.todos
            .reposition_todo(
                user.uuid,
                a.id,
                TodoPlacement {
                    prev: Some(b.id),
                    next: None,
                },
            )
            .await?;

        assert_eq!(
            ids(&ctx.todos.list_todos(user.uuid).await?),
            vec![c.id, b.id, a.id]
        );

        Ok(())
    }

    #[tokio::test]
    async fn reposition_with_non_adjacent_neighbours_is_stale() -> TestResult {
        let ctx = TestContext::new().await;
        let user = register_user(&ctx, "alice@example.com").await?;

        let a = create_todo(&ctx, user.uuid, "a").await?;
        let b = create_todo(&ctx, user.uuid, "b").await?;
        let c = create_todo(&ctx, user.uuid, "c").await?;
        let d = create_todo(&ctx, user.uuid, "d").await?;

        let result = ctx
            .todos
            .reposition_todo(
                user.uuid,
                d.id,
                TodoPlacement {
                    prev: Some(a.id),
                    next: Some(c.id),
                },
            )
            .await;

        assert!(
            matches!(result, Err(TodosServiceError::StalePlacement)),
            "expected StalePlacement, got {result:?}"
        );

        assert_eq!(
            ids(&ctx.todos.list_todos(user.uuid).await?),
            vec![a.id, b.id, c.id, d.id]
        );

        Ok(())
    }

    #[tokio::test]
    async fn reposition_next_to_itself_is_invalid() -> TestResult {
        let ctx = TestContext::new().await;
        let user = register_user(&ctx, "alice@example.com").await?;
        let a = create_todo(&ctx, user.uuid, "a").await?;

        let result = ctx
            .todos
            .reposition_todo(
                user.uuid,
                a.id,
                TodoPlacement {
                    prev: Some(a.id),
                    next: None,
                },
            )
            .await;

        assert!(
            matches!(result, Err(TodosServiceError::InvalidPlacement)),
            "expected InvalidPlacement, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn reposition_of_or_around_foreign_todos_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let alice = register_user(&ctx, "alice@example.com").await?;
        let mallory = register_user(&ctx, "mallory@example.com").await?;

        let private = create_todo(&ctx, alice.uuid, "private").await?;
        let own = create_todo(&ctx, mallory.uuid, "own").await?;

        let target_foreign = ctx
            .todos
            .reposition_todo(mallory.uuid, private.id, TodoPlacement::default())
            .await;

        let anchor_foreign = ctx
            .todos
            .reposition_todo(
                mallory.uuid,
                own.id,
                TodoPlacement {
                    prev: Some(private.id),
                    next: None,
                },
            )
            .await;

        assert!(
            matches!(target_foreign, Err(TodosServiceError::NotFound)),
            "expected NotFound, got {target_foreign:?}"
        );
        assert!(
            matches!(anchor_foreign, Err(TodosServiceError::NotFound)),
            "expected NotFound, got {anchor_foreign:?}"
        );

        let todos = ctx.todos.list_todos(alice.uuid).await?;

        assert_eq!(todos, vec![private]);

        Ok(())
    }

    #[tokio::test]
    async fn reposition_renumbers_when_gap_is_exhausted() -> TestResult {
        let ctx = TestContext::new().await;
        let user = register_user(&ctx, "alice@example.com").await?;

        let a = create_todo(&ctx, user.uuid, "a").await?;
        let b = create_todo(&ctx, user.uuid, "b").await?;
        let c = create_todo(&ctx, user.uuid, "c").await?;

        set_position(&ctx, a.id, "1.000000000001").await?;
        set_position(&ctx, b.id, "1.000000000002").await?;

        let moved = ctx
            .todos
            .reposition_todo(
                user.uuid,
                c.id,
                TodoPlacement {
                    prev: Some(a.id),
                    next: Some(b.id),
                },
            )
            .await?;

        let todos = ctx.todos.list_todos(user.uuid).await?;

        assert_eq!(ids(&todos), vec![a.id, c.id, b.id]);
        assert_eq!(moved.position, dec("1536"));
        assert_eq!(todos.first().map(|t| t.position), Some(dec("1024")));
        assert_eq!(todos.last().map(|t| t.position), Some(dec("2048")));

        Ok(())
    }

    #[tokio::test]
    async fn create_renumbers_when_last_key_cannot_grow() -> TestResult {
        let ctx = TestContext::new().await;
        let user = register_user(&ctx, "alice@example.com").await?;

        let a = create_todo(&ctx, user.uuid, "a").await?;
        let b = create_todo(&ctx, user.uuid, "b").await?;

        set_position(&ctx, b.id, &Decimal::MAX.to_string()).await?;

        let c = create_todo(&ctx, user.uuid, "c").await?;

        let todos = ctx.todos.list_todos(user.uuid).await?;

        assert_eq!(ids(&todos), vec![a.id, b.id, c.id]);
        assert_eq!(
            todos.iter().map(|t| t.position).collect::<Vec<_>>(),
            vec![dec("1024"), dec("2048"), dec("3072")]
        );

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_moves_into_one_slot_apply_one_at_a_time() -> TestResult {
        let ctx = TestContext::new().await;
        let user = register_user(&ctx, "alice@example.com").await?;

        let a = create_todo(&ctx, user.uuid, "a").await?;
        let b = create_todo(&ctx, user.uuid, "b").await?;
        let c = create_todo(&ctx, user.uuid, "c").await?;
        let d = create_todo(&ctx, user.uuid, "d").await?;

        let slot = TodoPlacement {
            prev: Some(a.id),
            next: Some(b.id),
        };

        let (move_c, move_d) = tokio::join!(
            ctx.todos.reposition_todo(user.uuid, c.id, slot),
            ctx.todos.reposition_todo(user.uuid, d.id, slot),
        );

        let outcomes = [&move_c, &move_d];
        let moved = outcomes.iter().filter(|result| result.is_ok()).count();
        let stale = outcomes
            .iter()
            .filter(|result| matches!(result, Err(TodosServiceError::StalePlacement)))
            .count();

        assert_eq!(moved, 1, "expected one move to win, got {move_c:?} / {move_d:?}");
        assert_eq!(stale, 1, "expected one stale move, got {move_c:?} / {move_d:?}");

        let todos = ctx.todos.list_todos(user.uuid).await?;

        assert_eq!(todos.len(), 4);
        assert_eq!(todos.first().map(|t| t.id), Some(a.id));
        assert!(
            todos.windows(2).all(|pair| match pair {
                [left, right] => left.position < right.position,
                _ => false,
            }),
            "positions are not strictly increasing: {todos:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_creates_never_share_a_key() -> TestResult {
        let ctx = TestContext::new().await;
        let user = register_user(&ctx, "alice@example.com").await?;

        let mut tasks = tokio::task::JoinSet::new();

        for n in 0..8 {
            let todos = ctx.todos.clone();
            let owner = user.uuid;

            tasks.spawn(async move {
                todos
                    .create_todo(
                        owner,
                        NewTodo {
                            description: format!("todo {n}"),
                        },
                    )
                    .await
            });
        }

        let mut keys = Vec::new();

        while let Some(created) = tasks.join_next().await {
            keys.push(created??.position);
        }

        keys.sort();
        keys.dedup();

        assert_eq!(keys.len(), 8, "duplicate keys in {keys:?}");
        assert_eq!(ctx.todos.list_todos(user.uuid).await?.len(), 8);

        Ok(())
    }
}
