//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db, HealthService, PgHealthService},
    domain::{
        orders::{
            OrdersService, PgOrdersService,
            pricing::{DeliveryPolicy, OrderTotalPolicy},
        },
        products::{PgProductsService, ProductsService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrate(#[source] sqlx::migrate::MigrateError),
}

/// Checkout rules applied by the orders service.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrdersSettings {
    pub total_policy: OrderTotalPolicy,
    pub delivery: DeliveryPolicy,
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub orders: Arc<dyn OrdersService>,
    pub auth: Arc<dyn AuthService>,
    pub health: Arc<dyn HealthService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or migrating fails.
    pub async fn from_database_url(
        url: &str,
        run_migrations: bool,
        orders: OrdersSettings,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        if run_migrations {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrate)?;
        }

        let db = Db::new(pool.clone());

        Ok(Self {
            products: Arc::new(PgProductsService::new(db.clone())),
            orders: Arc::new(
                PgOrdersService::new(db.clone())
                    .with_total_policy(orders.total_policy)
                    .with_delivery_policy(orders.delivery),
            ),
            auth: Arc::new(PgAuthService::new(pool)),
            health: Arc::new(PgHealthService::new(db)),
        })
    }
}
