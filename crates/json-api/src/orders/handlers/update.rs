//! Update Order Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    extensions::*,
    observability::{OrderEvent, record_order_event},
    orders::{
        errors::into_status_error,
        models::{OrderResponse, UpdateOrderRequest},
    },
    state::State,
};

/// Update Order Handler
///
/// Moves an order to a new status and stores manager notes. Cancelling returns the stock.
#[endpoint(
    tags("admin"),
    summary = "Update Order Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid status change"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.update",
    skip(order, json, depot),
    fields(order_uuid = tracing::field::Empty, status = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<UpdateOrderRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let order = order.into_inner();
    let update = json.into_inner();

    let span = tracing::Span::current();

    span.record("order_uuid", tracing::field::display(order));

    let updated = state
        .app
        .orders
        .update_order_status(depot.identity(), order.into(), update.into())
        .await
        .map_err(into_status_error)?;

    span.record("status", updated.status.as_str());

    record_order_event(OrderEvent::StatusChanged(updated.status));

    Ok(Json(updated.into()))
}
