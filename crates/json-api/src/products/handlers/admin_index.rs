//! Admin Product Index Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{extensions::*, products::models::ProductsResponse, state::State};

/// Admin Product Index Handler
///
/// Returns every product that has not been deleted, inactive ones included.
#[endpoint(
    tags("admin"),
    summary = "List All Products",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let products = state
        .app
        .products
        .list_all_products()
        .await
        .or_500("failed to fetch products")?;

    Ok(Json(products.into_iter().collect()))
}
