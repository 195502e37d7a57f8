//! Order request and response bodies.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::{
    orders::models::{
        CustomerDetails, NewOrder, Order, OrderHistoryEntry, OrderItem, OrderItems, OrderStatus,
        OrderStatusUpdate, OrderUuid, OrderWithHistory,
    },
    products::models::ProductUuid,
};

/// Order Status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OrderStatusBody {
    New,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl From<OrderStatusBody> for OrderStatus {
    fn from(status: OrderStatusBody) -> Self {
        match status {
            OrderStatusBody::New => OrderStatus::New,
            OrderStatusBody::Processing => OrderStatus::Processing,
            OrderStatusBody::Shipped => OrderStatus::Shipped,
            OrderStatusBody::Delivered => OrderStatus::Delivered,
            OrderStatusBody::Cancelled => OrderStatus::Cancelled,
        }
    }
}

impl From<OrderStatus> for OrderStatusBody {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::New => OrderStatusBody::New,
            OrderStatus::Processing => OrderStatusBody::Processing,
            OrderStatus::Shipped => OrderStatusBody::Shipped,
            OrderStatus::Delivered => OrderStatusBody::Delivered,
            OrderStatus::Cancelled => OrderStatusBody::Cancelled,
        }
    }
}

/// A line of the order snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemBody {
    /// Product identifier
    pub id: Uuid,

    /// Product name at checkout
    pub name: String,

    /// Unit price at checkout, in minor units
    pub price: u64,

    pub quantity: u32,
}

impl From<OrderItemBody> for OrderItem {
    fn from(item: OrderItemBody) -> Self {
        OrderItem {
            id: ProductUuid::from_uuid(item.id),
            name: item.name,
            price: item.price,
            quantity: item.quantity,
        }
    }
}

impl From<&OrderItem> for OrderItemBody {
    fn from(item: &OrderItem) -> Self {
        OrderItemBody {
            id: item.id.into_uuid(),
            name: item.name.clone(),
            price: item.price,
            quantity: item.quantity,
        }
    }
}

/// Create Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderRequest {
    #[serde(default)]
    pub customer_name: String,

    #[serde(default)]
    pub customer_email: String,

    #[serde(default)]
    pub customer_phone: String,

    #[serde(default)]
    pub customer_address: Option<String>,

    #[serde(default)]
    pub customer_comment: Option<String>,

    #[serde(default)]
    pub items: Vec<OrderItemBody>,

    /// Client-computed total, delivery included, in minor units
    #[serde(default)]
    pub total_amount: Option<u64>,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(request: CreateOrderRequest) -> Self {
        NewOrder {
            uuid: OrderUuid::new(),
            customer: CustomerDetails {
                name: request.customer_name,
                email: request.customer_email,
                phone: request.customer_phone,
                address: request.customer_address,
                comment: request.customer_comment,
            },
            items: request
                .items
                .into_iter()
                .map(OrderItem::from)
                .collect::<Vec<_>>()
                .into(),
            total_amount: request.total_amount,
        }
    }
}

/// Update Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateOrderRequest {
    pub status: OrderStatusBody,

    #[serde(default)]
    pub manager_notes: Option<String>,
}

impl From<UpdateOrderRequest> for OrderStatusUpdate {
    fn from(request: UpdateOrderRequest) -> Self {
        OrderStatusUpdate {
            status: request.status.into(),
            manager_notes: request.manager_notes,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,

    /// Owning user, absent for guest orders
    pub user_uuid: Option<Uuid>,

    pub customer_name: String,

    pub customer_email: String,

    pub customer_phone: String,

    pub customer_address: Option<String>,

    pub customer_comment: Option<String>,

    /// Snapshot of the cart at checkout
    pub items: Vec<OrderItemBody>,

    /// Amount charged, delivery included, in minor units
    pub total_amount: u64,

    pub status: OrderStatusBody,

    pub manager_notes: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

fn items_body(items: &OrderItems) -> Vec<OrderItemBody> {
    items.iter().map(OrderItemBody::from).collect()
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        OrderResponse {
            uuid: order.uuid.into(),
            user_uuid: order.user_uuid.map(Into::into),
            items: items_body(&order.items),
            customer_name: order.customer.name,
            customer_email: order.customer.email,
            customer_phone: order.customer.phone,
            customer_address: order.customer.address,
            customer_comment: order.customer.comment,
            total_amount: order.total_amount,
            status: order.status.into(),
            manager_notes: order.manager_notes,
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct HistoryEntryResponse {
    pub status: OrderStatusBody,

    pub note: String,

    pub created_at: String,
}

impl From<OrderHistoryEntry> for HistoryEntryResponse {
    fn from(entry: OrderHistoryEntry) -> Self {
        HistoryEntryResponse {
            status: entry.status.into(),
            note: entry.note,
            created_at: entry.created_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderDetailResponse {
    pub order: OrderResponse,

    /// Status changes, oldest first
    pub history: Vec<HistoryEntryResponse>,
}

impl From<OrderWithHistory> for OrderDetailResponse {
    fn from(detail: OrderWithHistory) -> Self {
        OrderDetailResponse {
            order: detail.order.into(),
            history: detail.history.into_iter().map(Into::into).collect(),
        }
    }
}
