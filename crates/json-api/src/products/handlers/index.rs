//! Product Index Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{extensions::*, products::models::ProductsResponse, state::State};

/// Product Index Handler
///
/// Returns the active catalog, popular products first.
#[endpoint(tags("products"), summary = "List Products")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let products = state
        .app
        .products
        .list_products()
        .await
        .or_500("failed to fetch products")?;

    Ok(Json(products.into_iter().collect()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use storefront_app::{
        auth::Identity,
        domain::products::{MockProductsService, ProductsServiceError, models::ProductUuid},
    };
    use testresult::TestResult;

    use crate::test_helpers::TestServices;

    use super::{super::tests::*, *};

    fn make_service(products: MockProductsService) -> Service {
        TestServices::with_products(products).service_as(
            Identity::Anonymous,
            Router::with_path("products").get(handler),
        )
    }

    #[tokio::test]
    async fn test_list_products_success() -> TestResult {
        let first = ProductUuid::new();
        let second = ProductUuid::new();

        let mut products = MockProductsService::new();

        products
            .expect_list_products()
            .once()
            .return_once(move || Ok(vec![make_product(first), make_product(second)]));

        let mut res = TestClient::get("http://example.com/products")
            .send(&make_service(products))
            .await;

        let body: ProductsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(
            body.products
                .iter()
                .map(|product| product.uuid)
                .collect::<Vec<_>>(),
            vec![first.into_uuid(), second.into_uuid()]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_list_products_storage_failure_returns_500() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_list_products()
            .once()
            .return_once(|| Err(ProductsServiceError::Sql(sqlx::Error::PoolTimedOut)));

        let res = TestClient::get("http://example.com/products")
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
