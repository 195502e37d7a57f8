//! Shared handler state

use std::sync::Arc;

use storefront_app::context::AppContext;

/// Services injected into the depot for every storefront and admin route.
#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
}

impl State {
    /// Wrap the application services for `salvo::affix_state::inject`.
    #[must_use]
    pub(crate) fn from_app_context(app: AppContext) -> Arc<Self> {
        Arc::new(Self { app })
    }
}
