//! App Router

use salvo::Router;

use crate::{
    auth::middleware::{authenticate, identify, require_admin},
    orders, products,
};

/// Public catalog plus checkout and own-order routes.
fn storefront_router() -> Router {
    Router::new()
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(Router::with_path("popular").get(products::popular::handler))
                .push(Router::with_path("{product}").get(products::get::handler)),
        )
        .push(
            Router::with_path("orders")
                .push(Router::new().hoop(identify).post(orders::create::handler))
                .push(Router::new().hoop(authenticate).get(orders::index::handler)),
        )
}

fn admin_router() -> Router {
    Router::with_path("admin")
        .hoop(authenticate)
        .hoop(require_admin)
        .push(
            Router::with_path("orders")
                .get(orders::admin_index::handler)
                .push(
                    Router::with_path("{order}")
                        .get(orders::get::handler)
                        .put(orders::update::handler)
                        .delete(orders::delete::handler),
                ),
        )
        .push(
            Router::with_path("products")
                .get(products::admin_index::handler)
                .post(products::create::handler)
                .push(
                    Router::with_path("{product}")
                        .put(products::update::handler)
                        .delete(products::delete::handler),
                ),
        )
}

pub(crate) fn app_router() -> Router {
    Router::new().push(storefront_router()).push(admin_router())
}
