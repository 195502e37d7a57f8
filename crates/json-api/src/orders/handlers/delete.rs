//! Delete Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    message::MessageResponse,
    observability::{OrderEvent, record_order_event},
    orders::errors::into_status_error,
    state::State,
};

/// Delete Order Handler
///
/// Removes an order and its history, returning its stock unless it was already cancelled.
#[endpoint(
    tags("admin"),
    summary = "Delete Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<MessageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let order = order.into_inner();

    state
        .app
        .orders
        .delete_order(depot.identity(), order.into())
        .await
        .map_err(into_status_error)?;

    record_order_event(OrderEvent::Deleted);

    Ok(Json(MessageResponse::new("Order deleted")))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use storefront_app::domain::orders::{MockOrdersService, OrdersServiceError, models::OrderUuid};
    use testresult::TestResult;

    use crate::test_helpers::{TestServices, admin};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        TestServices::with_orders(orders)
            .service_as(admin(), Router::with_path("admin/orders/{order}").delete(handler))
    }

    #[tokio::test]
    async fn test_delete_order_success() -> TestResult {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_delete_order()
            .once()
            .withf(move |identity, order| identity.is_admin() && *order == uuid)
            .return_once(|_, _| Ok(()));

        let mut res = TestClient::delete(format!("http://example.com/admin/orders/{uuid}"))
            .send(&make_service(orders))
            .await;

        let body: MessageResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.message, "Order deleted");

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_order_returns_404() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_delete_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::NotFound));

        let res = TestClient::delete(format!("http://example.com/admin/orders/{}", Uuid::now_v7()))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
