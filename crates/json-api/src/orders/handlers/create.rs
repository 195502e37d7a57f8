//! Create Order Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use crate::{
    extensions::*,
    observability::{OrderEvent, record_order_event},
    orders::{
        errors::{into_status_error, rejection_reason},
        models::{CreateOrderRequest, OrderResponse},
    },
    state::State,
};

/// Create Order Handler
///
/// Places an order for the resolved caller, or as a guest when no valid token was sent.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid order or not enough stock"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.create",
    skip(json, depot, res),
    fields(order_uuid = tracing::field::Empty, items = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity();
    let request = json.into_inner();

    tracing::Span::current().record("items", request.items.len());

    let order = match state
        .app
        .orders
        .create_order(identity, request.into())
        .await
    {
        Ok(order) => order,
        Err(error) => {
            if let Some(reason) = rejection_reason(&error) {
                record_order_event(OrderEvent::Rejected(reason));
            }

            return Err(into_status_error(error));
        }
    };

    record_order_event(OrderEvent::Created);

    tracing::Span::current().record("order_uuid", tracing::field::display(order.uuid));

    res.add_header(LOCATION, format!("/admin/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use storefront_app::{
        auth::Identity,
        domain::{
            orders::{
                MockOrdersService, OrdersServiceError,
                models::{OrderStatus, OrderUuid},
            },
            products::models::ProductUuid,
        },
    };
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::{
        orders::models::OrderStatusBody,
        test_helpers::{TEST_USER, TestServices, user},
    };

    use super::{super::tests::*, *};

    fn make_service(orders: MockOrdersService, identity: Identity) -> Service {
        TestServices::with_orders(orders)
            .service_as(identity, Router::with_path("orders").post(handler))
    }

    fn payload(product: Uuid) -> Value {
        json!({
            "customer_name": "Ada Lovelace",
            "customer_email": "ada@example.com",
            "customer_phone": "+44 20 7946 0000",
            "items": [{ "id": product, "name": "Dash Camera", "price": 4990, "quantity": 2 }],
            "total_amount": 59980,
        })
    }

    #[tokio::test]
    async fn test_create_guest_order_success() -> TestResult {
        let order_uuid = OrderUuid::new();
        let product = ProductUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .withf(move |identity, new| {
                *identity == Identity::Anonymous
                    && new.customer.name == "Ada Lovelace"
                    && new.total_amount == Some(59_980)
                    && new.items.quantities().get(&product) == Some(&2)
            })
            .return_once(move |_, _| Ok(make_order(order_uuid, OrderStatus::New)));

        let mut res = TestClient::post("http://example.com/orders")
            .json(&payload(product.into_uuid()))
            .send(&make_service(orders, Identity::Anonymous))
            .await;

        let body: OrderResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/admin/orders/{order_uuid}").as_str()));
        assert_eq!(body.uuid, order_uuid.into_uuid());
        assert_eq!(body.status, OrderStatusBody::New);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_passes_signed_in_user() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .withf(|identity, _| *identity == Identity::User(TEST_USER))
            .return_once(|_, _| {
                let mut order = make_order(OrderUuid::new(), OrderStatus::New);
                order.user_uuid = Some(TEST_USER);

                Ok(order)
            });

        let mut res = TestClient::post("http://example.com/orders")
            .json(&payload(Uuid::now_v7()))
            .send(&make_service(orders, user()))
            .await;

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.user_uuid, Some(TEST_USER.into_uuid()));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_insufficient_stock_returns_400() -> TestResult {
        let product = ProductUuid::new();

        let mut orders = MockOrdersService::new();

        orders.expect_create_order().once().return_once(move |_, _| {
            Err(OrdersServiceError::InsufficientStock {
                product,
                name: "Dash Camera".to_string(),
                available: 1,
                requested: 2,
            })
        });

        let res = TestClient::post("http://example.com/orders")
            .json(&payload(product.into_uuid()))
            .send(&make_service(orders, Identity::Anonymous))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_unknown_product_returns_404() -> TestResult {
        let product = ProductUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .return_once(move |_, _| Err(OrdersServiceError::ProductNotFound(product)));

        let res = TestClient::post("http://example.com/orders")
            .json(&payload(product.into_uuid()))
            .send(&make_service(orders, Identity::Anonymous))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_validation_failure_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_create_order().once().return_once(|_, _| {
            Err(OrdersServiceError::Validation(
                "customer_name is required".to_string(),
            ))
        });

        let res = TestClient::post("http://example.com/orders")
            .json(&json!({ "items": [] }))
            .send(&make_service(orders, Identity::Anonymous))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_negative_quantity_is_rejected_before_the_service() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_create_order().never();

        let res = TestClient::post("http://example.com/orders")
            .json(&json!({
                "customer_name": "Ada Lovelace",
                "items": [{ "id": Uuid::now_v7(), "name": "Dash Camera", "price": 4990, "quantity": -1 }],
                "total_amount": 59980,
            }))
            .send(&make_service(orders, Identity::Anonymous))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
