//! Orders service.

use std::collections::HashMap;

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};

use crate::{
    auth::Identity,
    database::Db,
    domain::{
        orders::{
            errors::OrdersServiceError,
            models::{
                NewOrder, Order, OrderFilter, OrderItems, OrderStatus, OrderStatusUpdate,
                OrderUuid, OrderWithHistory,
            },
            pricing::{DeliveryPolicy, OrderTotalPolicy},
            repositories::{PgOrderHistoryRepository, PgOrdersRepository},
            validation::validate_new_order,
        },
        products::{
            models::{ProductUuid, StockLevel},
            repository::PgProductsRepository,
        },
    },
};

pub const ORDER_CREATED_NOTE: &str = "order created";
pub const ORDER_CANCELLED_NOTE: &str = "cancelled, stock restored";
pub const STATUS_UPDATED_NOTE: &str = "status updated";

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders_repository: PgOrdersRepository,
    history_repository: PgOrderHistoryRepository,
    products_repository: PgProductsRepository,
    total_policy: OrderTotalPolicy,
    delivery_policy: DeliveryPolicy,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders_repository: PgOrdersRepository::new(),
            history_repository: PgOrderHistoryRepository::new(),
            products_repository: PgProductsRepository::new(),
            total_policy: OrderTotalPolicy::default(),
            delivery_policy: DeliveryPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_total_policy(mut self, total_policy: OrderTotalPolicy) -> Self {
        self.total_policy = total_policy;
        self
    }

    #[must_use]
    pub fn with_delivery_policy(mut self, delivery_policy: DeliveryPolicy) -> Self {
        self.delivery_policy = delivery_policy;
        self
    }

    /// Decide the total stored with a new order.
    fn settle_total(
        &self,
        items: &OrderItems,
        client_total: u64,
        stock: &HashMap<ProductUuid, StockLevel>,
    ) -> Result<u64, OrdersServiceError> {
        match self.total_policy {
            OrderTotalPolicy::Trust => {
                let expected = items
                    .subtotal()
                    .and_then(|subtotal| self.delivery_policy.total_for(subtotal));

                if expected != Some(client_total) {
                    tracing::warn!(
                        client_total,
                        expected_total = ?expected,
                        "order total does not match its items"
                    );
                }

                Ok(client_total)
            }
            OrderTotalPolicy::Verify => {
                let expected = items
                    .iter()
                    .try_fold(0_u64, |sum, item| {
                        let price = stock.get(&item.id)?.price;

                        sum.checked_add(price.checked_mul(u64::from(item.quantity))?)
                    })
                    .and_then(|subtotal| self.delivery_policy.total_for(subtotal));

                match expected {
                    Some(expected) if expected == client_total => Ok(client_total),
                    Some(expected) => Err(OrdersServiceError::Validation(format!(
                        "total_amount {client_total} does not match expected total {expected}"
                    ))),
                    None => Err(OrdersServiceError::Validation(
                        "order total is out of range".to_string(),
                    )),
                }
            }
        }
    }

    /// Return every snapshot line to stock.
    async fn restore_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &Order,
    ) -> Result<u32, OrdersServiceError> {
        let mut restored = 0_u32;

        for (product, quantity) in order.items.quantities() {
            let stock = self
                .products_repository
                .increment_stock(tx, product, quantity)
                .await?;

            match stock {
                Some(stock) => {
                    restored = restored.saturating_add(quantity);

                    tracing::debug!(
                        order_uuid = %order.uuid,
                        product_uuid = %product,
                        quantity,
                        stock,
                        "restored stock"
                    );
                }
                None => {
                    tracing::warn!(
                        order_uuid = %order.uuid,
                        product_uuid = %product,
                        quantity,
                        "product no longer exists, skipping stock restoration"
                    );
                }
            }
        }

        Ok(restored)
    }
}

fn require_admin(identity: Identity) -> Result<(), OrdersServiceError> {
    match identity {
        Identity::Admin(_) => Ok(()),
        Identity::User(_) => Err(OrdersServiceError::Forbidden),
        Identity::Anonymous => Err(OrdersServiceError::Unauthenticated),
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn create_order(
        &self,
        identity: Identity,
        order: NewOrder,
    ) -> Result<Order, OrdersServiceError> {
        let client_total = validate_new_order(&order)?;

        let quantities = order.items.quantities();
        let products: Vec<ProductUuid> = quantities.keys().copied().collect();

        let mut tx = self.db.begin_transaction().await?;

        let stock: HashMap<ProductUuid, StockLevel> = self
            .products_repository
            .lock_stock(&mut tx, &products)
            .await?
            .into_iter()
            .map(|level| (level.uuid, level))
            .collect();

        for (&product, &requested) in &quantities {
            let level = stock
                .get(&product)
                .ok_or(OrdersServiceError::ProductNotFound(product))?;

            if level.stock < requested {
                return Err(shortfall(level, requested));
            }
        }

        let total_amount = self.settle_total(&order.items, client_total, &stock)?;

        let created = self
            .orders_repository
            .create_order(&mut tx, &order, identity.user(), total_amount)
            .await?;

        for (&product, &requested) in &quantities {
            let remaining = self
                .products_repository
                .decrement_stock(&mut tx, product, requested)
                .await?;

            if remaining.is_none() {
                let level = stock
                    .get(&product)
                    .ok_or(OrdersServiceError::ProductNotFound(product))?;

                return Err(shortfall(level, requested));
            }
        }

        self.history_repository
            .append(&mut tx, created.uuid, OrderStatus::New, ORDER_CREATED_NOTE)
            .await?;

        tx.commit().await?;

        tracing::info!(
            order_uuid = %created.uuid,
            items = created.items.len(),
            total_amount = created.total_amount,
            guest = created.user_uuid.is_none(),
            "created order"
        );

        Ok(created)
    }

    async fn update_order_status(
        &self,
        identity: Identity,
        order: OrderUuid,
        update: OrderStatusUpdate,
    ) -> Result<Order, OrdersServiceError> {
        require_admin(identity)?;

        let mut tx = self.db.begin_transaction().await?;

        let current = self
            .orders_repository
            .lock_order(&mut tx, order)
            .await?
            .ok_or(OrdersServiceError::NotFound)?;

        if current.status.is_terminal() && current.status != update.status {
            return Err(OrdersServiceError::InvalidTransition {
                from: current.status,
                to: update.status,
            });
        }

        let restores_stock =
            update.status == OrderStatus::Cancelled && current.status != OrderStatus::Cancelled;

        let restored_units = if restores_stock {
            self.restore_stock(&mut tx, &current).await?
        } else {
            0
        };

        let manager_notes = update
            .manager_notes
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty());

        let updated = self
            .orders_repository
            .update_order_status(&mut tx, order, update.status, manager_notes)
            .await?;

        let note = if restores_stock {
            ORDER_CANCELLED_NOTE
        } else {
            manager_notes.unwrap_or(STATUS_UPDATED_NOTE)
        };

        self.history_repository
            .append(&mut tx, order, update.status, note)
            .await?;

        tx.commit().await?;

        tracing::info!(
            order_uuid = %order,
            from = %current.status,
            to = %updated.status,
            restored_units,
            "updated order status"
        );

        Ok(updated)
    }

    async fn delete_order(
        &self,
        identity: Identity,
        order: OrderUuid,
    ) -> Result<(), OrdersServiceError> {
        require_admin(identity)?;

        let mut tx = self.db.begin_transaction().await?;

        let current = self
            .orders_repository
            .lock_order(&mut tx, order)
            .await?
            .ok_or(OrdersServiceError::NotFound)?;

        let restores_stock = current.status != OrderStatus::Cancelled;

        let restored_units = if restores_stock {
            self.restore_stock(&mut tx, &current).await?
        } else {
            0
        };

        let rows_affected = self.orders_repository.delete_order(&mut tx, order).await?;

        if rows_affected == 0 {
            return Err(OrdersServiceError::NotFound);
        }

        tx.commit().await?;

        tracing::info!(
            order_uuid = %order,
            status = %current.status,
            restored_units,
            "deleted order"
        );

        Ok(())
    }

    async fn list_orders_for_user(
        &self,
        identity: Identity,
    ) -> Result<Vec<Order>, OrdersServiceError> {
        let user = match identity {
            Identity::User(user) => user,
            Identity::Admin(_) => return Err(OrdersServiceError::Forbidden),
            Identity::Anonymous => return Err(OrdersServiceError::Unauthenticated),
        };

        let mut tx = self.db.begin_transaction().await?;

        let orders = self
            .orders_repository
            .list_orders_for_user(&mut tx, user)
            .await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn list_orders(
        &self,
        identity: Identity,
        filter: OrderFilter,
    ) -> Result<Vec<Order>, OrdersServiceError> {
        require_admin(identity)?;

        let mut tx = self.db.begin_transaction().await?;

        let orders = self.orders_repository.list_orders(&mut tx, &filter).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn get_order(
        &self,
        identity: Identity,
        order: OrderUuid,
    ) -> Result<OrderWithHistory, OrdersServiceError> {
        require_admin(identity)?;

        let mut tx = self.db.begin_transaction().await?;

        let found = self.orders_repository.get_order(&mut tx, order).await?;

        let history = self
            .history_repository
            .list_for_order(&mut tx, order)
            .await?;

        tx.commit().await?;

        Ok(OrderWithHistory {
            order: found,
            history,
        })
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Place an order: reserve stock for every line and record the first history entry.
    ///
    /// Signed-in users own the order; everyone else places a guest order.
    async fn create_order(
        &self,
        identity: Identity,
        order: NewOrder,
    ) -> Result<Order, OrdersServiceError>;

    /// Move an order to a new status. Cancelling returns its stock.
    async fn update_order_status(
        &self,
        identity: Identity,
        order: OrderUuid,
        update: OrderStatusUpdate,
    ) -> Result<Order, OrdersServiceError>;

    /// Remove an order, returning its stock unless it was already cancelled.
    async fn delete_order(&self, identity: Identity, order: OrderUuid)
    -> Result<(), OrdersServiceError>;

    /// Orders placed by the signed-in user, or as a guest with their email.
    async fn list_orders_for_user(
        &self,
        identity: Identity,
    ) -> Result<Vec<Order>, OrdersServiceError>;

    /// Back-office listing, newest first.
    async fn list_orders(
        &self,
        identity: Identity,
        filter: OrderFilter,
    ) -> Result<Vec<Order>, OrdersServiceError>;

    /// A single order with its audit trail.
    async fn get_order(
        &self,
        identity: Identity,
        order: OrderUuid,
    ) -> Result<OrderWithHistory, OrdersServiceError>;
}

/// Insufficient stock error reporting the locked stock level.
fn shortfall(level: &StockLevel, requested: u32) -> OrdersServiceError {
    OrdersServiceError::InsufficientStock {
        product: level.uuid,
        name: level.name.clone(),
        available: level.stock,
        requested,
    }
}
