//! Auth middleware.
//!
//! `identify` resolves an optional bearer token, `authenticate` requires one
//! and `require_admin` narrows an authenticated route to administrators.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};
use storefront_app::auth::{AuthServiceError, Identity};
use tracing::{error, warn};

use crate::{extensions::*, state::State};

enum Bearer {
    Missing,
    Rejected,
    Resolved(Identity),
}

/// Resolve the caller when a bearer token is present; anonymous otherwise.
///
/// A token that does not resolve is logged and treated as anonymous.
#[salvo::handler]
pub(crate) async fn identify(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let identity = match resolve_bearer(req, depot).await {
        Ok(Bearer::Missing) => Identity::Anonymous,
        Ok(Bearer::Rejected) => {
            warn!("bearer token did not resolve, continuing as guest");

            Identity::Anonymous
        }
        Ok(Bearer::Resolved(identity)) => identity,
        Err(status) => {
            res.render(status);
            ctrl.skip_rest();

            return;
        }
    };

    depot.insert_identity(identity);

    ctrl.call_next(req, depot, res).await;
}

/// Require a bearer token that resolves to a user or an administrator.
#[salvo::handler]
pub(crate) async fn authenticate(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let identity = match resolve_bearer(req, depot).await {
        Ok(Bearer::Resolved(identity)) => identity,
        Ok(Bearer::Missing) => {
            res.render(StatusError::unauthorized().brief("Missing or invalid Authorization header"));
            ctrl.skip_rest();

            return;
        }
        Ok(Bearer::Rejected) => {
            res.render(StatusError::unauthorized().brief("Invalid API token"));
            ctrl.skip_rest();

            return;
        }
        Err(status) => {
            res.render(status);
            ctrl.skip_rest();

            return;
        }
    };

    depot.insert_identity(identity);

    ctrl.call_next(req, depot, res).await;
}

/// Reject callers that are not administrators. Runs after `authenticate`.
#[salvo::handler]
pub(crate) async fn require_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    match depot.identity() {
        Identity::Admin(_) => {
            ctrl.call_next(req, depot, res).await;
        }
        Identity::User(_) => {
            res.render(StatusError::forbidden().brief("Administrator access required"));
            ctrl.skip_rest();
        }
        Identity::Anonymous => {
            res.render(StatusError::unauthorized().brief("Authentication required"));
            ctrl.skip_rest();
        }
    }
}

async fn resolve_bearer(req: &Request, depot: &Depot) -> Result<Bearer, StatusError> {
    let Some(token) = extract_bearer_token(req) else {
        return Ok(Bearer::Missing);
    };

    let state = depot.obtain_or_500::<Arc<State>>()?;

    match state.app.auth.authenticate_bearer(token).await {
        Ok(identity) => Ok(Bearer::Resolved(identity)),
        Err(AuthServiceError::NotFound) => Ok(Bearer::Rejected),
        Err(source) => {
            error!("failed to validate api token: {source}");

            Err(StatusError::internal_server_error())
        }
    }
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}
