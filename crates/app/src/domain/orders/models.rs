//! Order data models.

use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use jiff::Timestamp;
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use thiserror::Error;
use uuid::Uuid;

use crate::{auth::UserUuid, domain::products::models::ProductUuid, uuids::TypedUuid};

pub type OrderUuid = TypedUuid<Order>;

/// Default number of orders per admin listing page.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Upper bound on the admin listing page size.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Fulfilment state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    New,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [Self; 5] = [
        Self::New,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Terminal orders never move to another status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown order status: {0}")]
pub struct UnknownOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownOrderStatus(value.to_string()))
    }
}

/// One line of the items snapshot, as captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: ProductUuid,
    pub name: String,
    pub price: u64,
    pub quantity: u32,
}

impl OrderItem {
    #[must_use]
    pub fn line_total(&self) -> Option<u64> {
        self.price.checked_mul(u64::from(self.quantity))
    }
}

/// Immutable items snapshot of an order.
///
/// Deserializes from a JSON array, or from a JSON string holding an encoded array.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct OrderItems(Vec<OrderItem>);

#[derive(Deserialize)]
#[serde(untagged)]
enum OrderItemsRepr {
    Items(Vec<OrderItem>),
    Encoded(String),
}

impl<'de> Deserialize<'de> for OrderItems {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match OrderItemsRepr::deserialize(deserializer)? {
            OrderItemsRepr::Items(items) => Ok(Self(items)),
            OrderItemsRepr::Encoded(raw) => serde_json::from_str::<Vec<OrderItem>>(&raw)
                .map(Self)
                .map_err(D::Error::custom),
        }
    }
}

impl OrderItems {
    #[must_use]
    pub fn new(items: Vec<OrderItem>) -> Self {
        Self(items)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[OrderItem] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OrderItem> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of `price * quantity` over every line; `None` on overflow.
    #[must_use]
    pub fn subtotal(&self) -> Option<u64> {
        self.iter()
            .try_fold(0_u64, |sum, item| sum.checked_add(item.line_total()?))
    }

    /// Requested quantity per product, duplicate lines summed, in uuid order.
    #[must_use]
    pub fn quantities(&self) -> BTreeMap<ProductUuid, u32> {
        let mut quantities = BTreeMap::new();

        for item in self {
            let quantity: &mut u32 = quantities.entry(item.id).or_default();
            *quantity = quantity.saturating_add(item.quantity);
        }

        quantities
    }
}

impl From<Vec<OrderItem>> for OrderItems {
    fn from(items: Vec<OrderItem>) -> Self {
        Self(items)
    }
}

impl<'a> IntoIterator for &'a OrderItems {
    type Item = &'a OrderItem;
    type IntoIter = std::slice::Iter<'a, OrderItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Contact and delivery details captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub comment: Option<String>,
}

/// Checkout payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub customer: CustomerDetails,
    pub items: OrderItems,
    /// Client-computed total, delivery included.
    pub total_amount: Option<u64>,
}

/// Admin status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
    pub manager_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub uuid: OrderUuid,
    pub user_uuid: Option<UserUuid>,
    pub customer: CustomerDetails,
    pub items: OrderItems,
    pub total_amount: u64,
    pub status: OrderStatus,
    pub manager_notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Audit trail row. Append-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderHistoryEntry {
    pub uuid: Uuid,
    pub order_uuid: OrderUuid,
    pub status: OrderStatus,
    pub note: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderWithHistory {
    pub order: Order,
    pub history: Vec<OrderHistoryEntry>,
}

/// Admin listing filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl OrderFilter {
    /// One-based page number.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size; a missing or zero limit means the default.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
            .filter(|&limit| limit > 0)
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .min(MAX_PAGE_LIMIT)
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page() - 1) * u64::from(self.limit())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn item(id: ProductUuid, price: u64, quantity: u32) -> OrderItem {
        OrderItem {
            id,
            name: "Widget".to_string(),
            price,
            quantity,
        }
    }

    #[test]
    fn status_parses_every_wire_value() -> TestResult {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>()?, status);
        }

        assert!("all".parse::<OrderStatus>().is_err());

        Ok(())
    }

    #[test]
    fn only_delivered_and_cancelled_are_terminal() {
        let terminal: Vec<OrderStatus> = OrderStatus::ALL
            .into_iter()
            .filter(|status| status.is_terminal())
            .collect();

        assert_eq!(terminal, [OrderStatus::Delivered, OrderStatus::Cancelled]);
    }

    #[test]
    fn items_decode_from_array_or_encoded_string() -> TestResult {
        let id = ProductUuid::new();
        let array = json!([{ "id": id, "name": "Widget", "price": 100, "quantity": 2 }]);
        let encoded = serde_json::Value::String(array.to_string());

        let from_array: OrderItems = serde_json::from_value(array)?;
        let from_string: OrderItems = serde_json::from_value(encoded)?;

        assert_eq!(from_array, from_string);
        assert_eq!(from_array.as_slice(), [item(id, 100, 2)]);

        Ok(())
    }

    #[test]
    fn items_reject_garbage_strings() {
        let result = serde_json::from_value::<OrderItems>(json!("not json"));

        assert!(result.is_err(), "expected decode failure, got {result:?}");
    }

    #[test]
    fn quantities_sum_duplicate_lines() {
        let first = ProductUuid::new();
        let second = ProductUuid::new();

        let items = OrderItems::new(vec![
            item(first, 100, 2),
            item(second, 50, 1),
            item(first, 100, 3),
        ]);

        let quantities = items.quantities();

        assert_eq!(quantities.get(&first), Some(&5));
        assert_eq!(quantities.get(&second), Some(&1));
        assert_eq!(items.subtotal(), Some(550));
    }

    #[test]
    fn subtotal_overflow_is_none() {
        let items = OrderItems::new(vec![item(ProductUuid::new(), u64::MAX, 2)]);

        assert_eq!(items.subtotal(), None);
    }

    #[test]
    fn filter_defaults_and_clamps() {
        let filter = OrderFilter::default();

        assert_eq!((filter.page(), filter.limit(), filter.offset()), (1, 20, 0));

        let filter = OrderFilter {
            status: None,
            page: Some(3),
            limit: Some(500),
        };

        assert_eq!((filter.page(), filter.limit(), filter.offset()), (3, 100, 200));

        let filter = OrderFilter {
            status: None,
            page: Some(0),
            limit: Some(0),
        };

        assert_eq!(
            (filter.page(), filter.limit()),
            (1, DEFAULT_PAGE_LIMIT),
            "zero limit falls back to the default page size"
        );
    }
}
