//! Popular Products Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{extensions::*, products::models::ProductsResponse, state::State};

/// Popular Products Handler
///
/// Returns a short list of active products flagged as popular.
#[endpoint(tags("products"), summary = "List Popular Products")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let products = state
        .app
        .products
        .list_popular_products()
        .await
        .or_500("failed to fetch popular products")?;

    Ok(Json(products.into_iter().collect()))
}
