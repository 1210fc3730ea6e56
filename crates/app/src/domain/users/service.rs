//! Users service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::users::{
        data::UsernameUpdate,
        errors::UsersServiceError,
        records::{UserRecord, UserUuid},
        repository::PgUsersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    repository: PgUsersRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgUsersRepository::new(),
        }
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let stored = self.repository.get_user_by_uuid(&mut tx, user).await?;

        tx.commit().await?;

        Ok(stored.record)
    }

    async fn update_username(
        &self,
        user: UserUuid,
        update: UsernameUpdate,
    ) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_username(&mut tx, user, &update.username)
            .await?
            .ok_or(UsersServiceError::NotFound)?;

        tx.commit().await?;

        Ok(updated.record)
    }

    async fn delete_user(&self, user: UserUuid) -> Result<(), UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_user(&mut tx, user).await?;

        if rows_affected == 0 {
            return Err(UsersServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Retrieve the public profile of a user.
    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError>;

    /// Change a user's display name.
    async fn update_username(
        &self,
        user: UserUuid,
        update: UsernameUpdate,
    ) -> Result<UserRecord, UsersServiceError>;

    /// Delete a user together with all of their todos.
    async fn delete_user(&self, user: UserUuid) -> Result<(), UsersServiceError>;
}
