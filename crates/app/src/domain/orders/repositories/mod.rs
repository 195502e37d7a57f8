//! Order Repositories

use sqlx::{Row, postgres::PgRow};

use crate::domain::orders::models::OrderStatus;

mod history;
mod orders;

pub(crate) use history::PgOrderHistoryRepository;
pub(crate) use orders::PgOrdersRepository;

fn decode_status(row: &PgRow) -> Result<OrderStatus, sqlx::Error> {
    let status: String = row.try_get("status")?;

    status.parse().map_err(|error| sqlx::Error::ColumnDecode {
        index: "status".to_string(),
        source: Box::new(error),
    })
}
