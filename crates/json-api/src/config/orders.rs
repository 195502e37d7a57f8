//! Orders Config

use clap::Args;

use storefront_app::{
    context::OrdersSettings,
    domain::orders::pricing::{DeliveryPolicy, OrderTotalPolicy},
};

/// Checkout settings.
#[derive(Debug, Args)]
pub struct OrdersConfig {
    /// How the client-supplied order total is treated (trust, verify)
    #[arg(long, env = "ORDER_TOTAL_POLICY", value_enum, default_value_t = OrderTotalPolicy::Trust)]
    pub order_total_policy: OrderTotalPolicy,

    /// Flat delivery fee in minor units
    #[arg(long, env = "DELIVERY_FEE", default_value_t = DeliveryPolicy::DEFAULT_FEE)]
    pub delivery_fee: u64,

    /// Subtotal above which delivery is free, in minor units
    #[arg(
        long,
        env = "FREE_DELIVERY_THRESHOLD",
        default_value_t = DeliveryPolicy::DEFAULT_FREE_THRESHOLD
    )]
    pub free_delivery_threshold: u64,
}

impl OrdersConfig {
    /// Settings handed to the orders service.
    #[must_use]
    pub fn settings(&self) -> OrdersSettings {
        OrdersSettings {
            total_policy: self.order_total_policy,
            delivery: DeliveryPolicy {
                fee: self.delivery_fee,
                free_threshold: self.free_delivery_threshold,
            },
        }
    }
}
