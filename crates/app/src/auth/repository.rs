//! Auth repository.

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::auth::models::{
    Admin, AdminUuid, Identity, NewAdmin, NewUser, TokenOwner, User, UserUuid,
};

const FIND_IDENTITY_BY_TOKEN_HASH_SQL: &str =
    include_str!("sql/find_identity_by_token_hash.sql");
const CREATE_USER_SQL: &str = include_str!("sql/create_user.sql");
const CREATE_ADMIN_SQL: &str = include_str!("sql/create_admin.sql");
const DEACTIVATE_ADMIN_SQL: &str = include_str!("sql/deactivate_admin.sql");
const CREATE_API_TOKEN_SQL: &str = include_str!("sql/create_api_token.sql");
const REVOKE_API_TOKEN_SQL: &str = include_str!("sql/revoke_api_token.sql");

#[derive(Debug, Clone)]
pub(crate) struct PgAuthRepository {
    pool: PgPool,
}

/// Owner columns of a live token row.
struct TokenIdentity(Identity);

impl PgAuthRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn find_identity_by_token_hash(
        &self,
        hash: &str,
    ) -> Result<Option<Identity>, sqlx::Error> {
        query_as::<Postgres, TokenIdentity>(FIND_IDENTITY_BY_TOKEN_HASH_SQL)
            .bind(hash)
            .fetch_optional(&self.pool)
            .await
            .map(|record| record.map(|record| record.0))
    }

    pub(crate) async fn create_user(&self, user: &NewUser) -> Result<User, sqlx::Error> {
        query_as::<Postgres, User>(CREATE_USER_SQL)
            .bind(user.uuid.into_uuid())
            .bind(&user.email)
            .bind(&user.full_name)
            .bind(user.phone.as_deref())
            .fetch_one(&self.pool)
            .await
    }

    pub(crate) async fn create_admin(&self, admin: &NewAdmin) -> Result<Admin, sqlx::Error> {
        query_as::<Postgres, Admin>(CREATE_ADMIN_SQL)
            .bind(admin.uuid.into_uuid())
            .bind(&admin.email)
            .bind(&admin.name)
            .fetch_one(&self.pool)
            .await
    }

    pub(crate) async fn deactivate_admin(&self, admin: AdminUuid) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DEACTIVATE_ADMIN_SQL)
            .bind(admin.into_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn create_api_token(
        &self,
        uuid: Uuid,
        token_hash: &str,
        owner: TokenOwner,
    ) -> Result<(), sqlx::Error> {
        let (user_uuid, admin_uuid) = match owner {
            TokenOwner::User(user) => (Some(user.into_uuid()), None),
            TokenOwner::Admin(admin) => (None, Some(admin.into_uuid())),
        };

        query(CREATE_API_TOKEN_SQL)
            .bind(uuid)
            .bind(token_hash)
            .bind(user_uuid)
            .bind(admin_uuid)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub(crate) async fn revoke_api_token(&self, uuid: Uuid) -> Result<u64, sqlx::Error> {
        let rows_affected = query(REVOKE_API_TOKEN_SQL)
            .bind(uuid)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for TokenIdentity {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let user_uuid: Option<Uuid> = row.try_get("user_uuid")?;
        let admin_uuid: Option<Uuid> = row.try_get("admin_uuid")?;

        let identity = match (user_uuid, admin_uuid) {
            (Some(user), None) => Identity::User(UserUuid::from_uuid(user)),
            (None, Some(admin)) => Identity::Admin(AdminUuid::from_uuid(admin)),
            _ => Identity::Anonymous,
        };

        Ok(Self(identity))
    }
}

impl<'r> FromRow<'r, PgRow> for User {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            email: row.try_get("email")?,
            full_name: row.try_get("full_name")?,
            phone: row.try_get("phone")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Admin {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: AdminUuid::from_uuid(row.try_get("uuid")?),
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
