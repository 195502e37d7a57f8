//! Test helpers.

use std::sync::Arc;

use salvo::{affix_state::inject, prelude::*};
use storefront_app::{
    auth::{AdminUuid, Identity, MockAuthService, UserUuid},
    context::AppContext,
    database::MockHealthService,
    domain::{orders::MockOrdersService, products::MockProductsService},
};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER: UserUuid = UserUuid::from_uuid(Uuid::nil());
pub(crate) const TEST_ADMIN: AdminUuid = AdminUuid::from_uuid(Uuid::max());

/// Service mocks backing a test state.
///
/// A mock without expectations panics on any call, so unused services stay strict.
#[derive(Default)]
pub(crate) struct TestServices {
    pub(crate) products: MockProductsService,
    pub(crate) orders: MockOrdersService,
    pub(crate) auth: MockAuthService,
    pub(crate) health: MockHealthService,
}

impl TestServices {
    pub(crate) fn with_products(products: MockProductsService) -> Self {
        Self {
            products,
            ..Self::default()
        }
    }

    pub(crate) fn with_orders(orders: MockOrdersService) -> Self {
        Self {
            orders,
            ..Self::default()
        }
    }

    pub(crate) fn with_health(health: MockHealthService) -> Self {
        Self {
            health,
            ..Self::default()
        }
    }

    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            products: Arc::new(self.products),
            orders: Arc::new(self.orders),
            auth: Arc::new(self.auth),
            health: Arc::new(self.health),
        })
    }

    /// Serve `route` with the caller already resolved to `identity`.
    pub(crate) fn service_as(self, identity: Identity, route: Router) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(self.into_state()))
                .hoop(InjectIdentity(identity))
                .push(route),
        )
    }
}

struct InjectIdentity(Identity);

#[salvo::handler]
impl InjectIdentity {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        depot.insert_identity(self.0);
        ctrl.call_next(req, depot, res).await;
    }
}

pub(crate) fn admin() -> Identity {
    Identity::Admin(TEST_ADMIN)
}

pub(crate) fn user() -> Identity {
    Identity::User(TEST_USER)
}
