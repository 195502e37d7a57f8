//! Admin Order Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};
use storefront_app::domain::orders::models::{OrderFilter, OrderStatus};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
    state::State,
};

/// `all` or no value lists every status.
fn parse_status(status: Option<String>) -> Result<Option<OrderStatus>, StatusError> {
    match status.as_deref() {
        None | Some("all") => Ok(None),
        Some(value) => value.parse::<OrderStatus>().map(Some).or_400(),
    }
}

/// Admin Order Index Handler
///
/// Lists orders newest first, optionally filtered by status.
#[endpoint(
    tags("admin"),
    summary = "List Orders",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Orders"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown status filter"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::FORBIDDEN, description = "Forbidden"),
    ),
)]
pub(crate) async fn handler(
    status: QueryParam<String, false>,
    page: QueryParam<u32, false>,
    limit: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<Vec<OrderResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let filter = OrderFilter {
        status: parse_status(status.into_inner())?,
        page: page.into_inner(),
        limit: limit.into_inner(),
    };

    let orders = state
        .app
        .orders
        .list_orders(depot.identity(), filter)
        .await
        .map_err(into_status_error)?;

    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use storefront_app::domain::orders::{MockOrdersService, models::OrderUuid};
    use testresult::TestResult;

    use crate::test_helpers::{TestServices, admin};

    use super::{super::tests::*, *};

    fn make_service(orders: MockOrdersService) -> Service {
        TestServices::with_orders(orders)
            .service_as(admin(), Router::with_path("admin/orders").get(handler))
    }

    #[tokio::test]
    async fn test_admin_list_orders_with_filter() -> TestResult {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_list_orders()
            .once()
            .withf(|identity, filter| {
                identity.is_admin()
                    && *filter
                        == OrderFilter {
                            status: Some(OrderStatus::Shipped),
                            page: Some(2),
                            limit: Some(5),
                        }
            })
            .return_once(move |_, _| Ok(vec![make_order(uuid, OrderStatus::Shipped)]));

        let mut res = TestClient::get("http://example.com/admin/orders?status=shipped&page=2&limit=5")
            .send(&make_service(orders))
            .await;

        let body: Vec<OrderResponse> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_list_orders_all_means_no_filter() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_orders()
            .once()
            .withf(|_, filter| *filter == OrderFilter::default())
            .return_once(|_, _| Ok(Vec::new()));

        let res = TestClient::get("http://example.com/admin/orders?status=all")
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_list_orders_unknown_status_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_list_orders().never();

        let res = TestClient::get("http://example.com/admin/orders?status=lost")
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[test]
    fn parse_status_accepts_every_known_status() -> TestResult {
        for status in OrderStatus::ALL {
            assert_eq!(parse_status(Some(status.as_str().to_string()))?, Some(status));
        }

        assert_eq!(parse_status(None)?, None);

        Ok(())
    }
}
