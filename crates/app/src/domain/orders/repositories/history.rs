//! Order Status History Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::domain::orders::models::{OrderHistoryEntry, OrderStatus, OrderUuid};

use super::decode_status;

const CREATE_HISTORY_ENTRY_SQL: &str = include_str!("../sql/create_history_entry.sql");
const LIST_HISTORY_ENTRIES_SQL: &str = include_str!("../sql/list_history_entries.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderHistoryRepository;

impl PgOrderHistoryRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn append(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
        note: &str,
    ) -> Result<OrderHistoryEntry, sqlx::Error> {
        query_as::<Postgres, OrderHistoryEntry>(CREATE_HISTORY_ENTRY_SQL)
            .bind(Uuid::now_v7())
            .bind(order.into_uuid())
            .bind(status.as_str())
            .bind(note)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_for_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<OrderHistoryEntry>, sqlx::Error> {
        query_as::<Postgres, OrderHistoryEntry>(LIST_HISTORY_ENTRIES_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderHistoryEntry {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            status: decode_status(row)?,
            note: row.try_get("note")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
