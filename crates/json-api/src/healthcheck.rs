//! Storefront JSON API Healthcheck Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{extensions::*, state::State};

/// Healthcheck response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Database reachability
    pub database: String,
}

/// Healthcheck handler
///
/// Returns service health status, 503 when the database cannot be reached.
#[endpoint(
    tags("health"),
    summary = "Health check endpoint",
    responses(
        (status_code = StatusCode::OK, description = "Healthy"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Database unreachable"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<HealthResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let response = match state.app.health.ping().await {
        Ok(()) => HealthResponse {
            status: "ok".to_string(),
            database: "connected".to_string(),
        },
        Err(source) => {
            error!("database health check failed: {source}");

            res.status_code(StatusCode::SERVICE_UNAVAILABLE);

            HealthResponse {
                status: "error".to_string(),
                database: "unreachable".to_string(),
            }
        }
    };

    Ok(Json(response))
}
