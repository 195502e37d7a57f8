//! Test context for service-level integration tests.

use crate::{
    auth::PgAuthService,
    database::Db,
    domain::{
        orders::{PgOrdersService, models::OrderUuid},
        products::{PgProductsService, models::ProductUuid},
    },
};

use super::db::TestDb;

pub struct TestContext {
    pub test_db: TestDb,
    pub db: Db,
    pub products: PgProductsService,
    pub orders: PgOrdersService,
    pub auth: PgAuthService,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());

        Self {
            products: PgProductsService::new(db.clone()),
            orders: PgOrdersService::new(db.clone()),
            auth: PgAuthService::new(test_db.pool().clone()),
            db,
            test_db,
        }
    }

    /// Current stock of a product, read straight from storage.
    pub async fn stock_of(&self, product: ProductUuid) -> i32 {
        sqlx::query_scalar("SELECT stock FROM products WHERE uuid = $1")
            .bind(product.into_uuid())
            .fetch_one(self.test_db.pool())
            .await
            .expect("Failed to read product stock")
    }

    /// Number of history rows stored for an order.
    pub async fn history_count(&self, order: OrderUuid) -> i64 {
        sqlx::query_scalar("SELECT count(*) FROM order_status_history WHERE order_uuid = $1")
            .bind(order.into_uuid())
            .fetch_one(self.test_db.pool())
            .await
            .expect("Failed to count history rows")
    }

    /// Number of orders stored.
    pub async fn order_count(&self) -> i64 {
        sqlx::query_scalar("SELECT count(*) FROM orders")
            .fetch_one(self.test_db.pool())
            .await
            .expect("Failed to count orders")
    }
}
