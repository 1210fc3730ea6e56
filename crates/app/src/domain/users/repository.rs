//! Users Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::domain::users::{
    data::NewUser,
    records::{StoredUser, UserId, UserRecord, UserUuid},
};

const CREATE_USER_SQL: &str = include_str!("sql/create_user.sql");
const GET_USER_BY_EMAIL_SQL: &str = include_str!("sql/get_user_by_email.sql");
const GET_USER_BY_UUID_SQL: &str = include_str!("sql/get_user_by_uuid.sql");
const FIND_USER_ID_SQL: &str = include_str!("sql/find_user_id.sql");
const LOCK_USER_ID_SQL: &str = include_str!("sql/lock_user_id.sql");
const UPDATE_USERNAME_SQL: &str = include_str!("sql/update_username.sql");
const DELETE_USER_SQL: &str = include_str!("sql/delete_user.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgUsersRepository;

impl PgUsersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: NewUser,
    ) -> Result<StoredUser, sqlx::Error> {
        query_as::<Postgres, StoredUser>(CREATE_USER_SQL)
            .bind(user.uuid.into_uuid())
            .bind(user.email)
            .bind(user.password_hash)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_user_by_email(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
    ) -> Result<Option<StoredUser>, sqlx::Error> {
        query_as::<Postgres, StoredUser>(GET_USER_BY_EMAIL_SQL)
            .bind(email)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn get_user_by_uuid(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<StoredUser, sqlx::Error> {
        query_as::<Postgres, StoredUser>(GET_USER_BY_UUID_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Resolve an external UUID to the storage key.
    pub(crate) async fn find_user_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<UserId>, sqlx::Error> {
        let id: Option<i64> = query_scalar(FIND_USER_ID_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        Ok(id.map(UserId))
    }

    /// Resolve an external UUID and hold the owner row lock until the
    /// transaction ends. Serializes list mutations for one user.
    pub(crate) async fn lock_user_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<UserId>, sqlx::Error> {
        let id: Option<i64> = query_scalar(LOCK_USER_ID_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        Ok(id.map(UserId))
    }

    pub(crate) async fn update_username(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        username: &str,
    ) -> Result<Option<StoredUser>, sqlx::Error> {
        query_as::<Postgres, StoredUser>(UPDATE_USERNAME_SQL)
            .bind(user.into_uuid())
            .bind(username)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn delete_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_USER_SQL)
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for StoredUser {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: UserId(row.try_get("id")?),
            password_hash: row.try_get("password_hash")?,
            record: UserRecord {
                uuid: UserUuid::from_uuid(row.try_get("uuid")?),
                email: row.try_get("email")?,
                username: row.try_get("username")?,
                created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
                updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            },
        })
    }
}
