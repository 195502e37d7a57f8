//! Database connection management

use async_trait::async_trait;
use mockall::automock;
use sqlx::{
    PgPool, Postgres, Row, Transaction, migrate::MigrateError, postgres::PgRow, query_scalar,
};

const PING_SQL: &str = "SELECT 1";

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction on the shared pool.
    ///
    /// # Errors
    ///
    /// Returns an error when a connection cannot be acquired or `BEGIN` fails.
    pub async fn begin_transaction(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Convert a minor-unit amount into its `BIGINT` column value.
pub(crate) fn encode_amount(amount: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(amount).map_err(|error| sqlx::Error::Encode(Box::new(error)))
}

/// Read a non-negative `BIGINT` amount column.
pub(crate) fn try_get_amount(row: &PgRow, column: &str) -> Result<u64, sqlx::Error> {
    let value: i64 = row.try_get(column)?;

    u64::try_from(value).map_err(|error| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(error),
    })
}

/// Convert a quantity into its `INTEGER` column value.
pub(crate) fn encode_quantity(quantity: u32) -> Result<i32, sqlx::Error> {
    i32::try_from(quantity).map_err(|error| sqlx::Error::Encode(Box::new(error)))
}

/// Read a non-negative `INTEGER` quantity column.
pub(crate) fn try_get_quantity(row: &PgRow, column: &str) -> Result<u32, sqlx::Error> {
    let value: i32 = row.try_get(column)?;

    decode_quantity(value, column)
}

pub(crate) fn decode_quantity(value: i32, column: &str) -> Result<u32, sqlx::Error> {
    u32::try_from(value).map_err(|error| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(error),
    })
}

/// Apply the embedded schema migrations.
///
/// # Errors
///
/// Returns an error if any migration fails to apply.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// Database liveness probe.
#[derive(Debug, Clone)]
pub struct PgHealthService {
    db: Db,
}

impl PgHealthService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HealthService for PgHealthService {
    async fn ping(&self) -> Result<(), sqlx::Error> {
        query_scalar::<Postgres, i32>(PING_SQL)
            .fetch_one(self.db.pool())
            .await
            .map(|_| ())
    }
}

#[automock]
#[async_trait]
pub trait HealthService: Send + Sync {
    /// Round-trips a trivial query to confirm the database is reachable.
    async fn ping(&self) -> Result<(), sqlx::Error>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestDb;

    use super::*;

    #[tokio::test]
    async fn ping_succeeds_against_live_database() -> TestResult {
        let test_db = TestDb::new().await;
        let health = PgHealthService::new(Db::new(test_db.pool().clone()));

        health.ping().await?;

        Ok(())
    }
}
