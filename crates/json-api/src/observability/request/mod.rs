//! Request-level logging, request IDs, and parent trace extraction.

mod parent_context;
mod request_ids;
mod spans;

use std::time::Instant;

use salvo::{
    Request, handler,
    http::StatusCode,
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::Instrument as _;
use tracing::{error, info, warn};
use tracing_opentelemetry::OpenTelemetrySpanExt as _;

use super::{metrics, settings};
use crate::extensions::*;

const REQUEST_ID_DEPOT_KEY: &str = "request_id";

#[handler]
pub(crate) async fn request_logging(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if req.uri().path() == "/metrics" {
        ctrl.call_next(req, depot, res).await;
        return;
    }

    let started = Instant::now();

    let request_id =
        request_ids::resolve_request_id(req.header::<String>(request_ids::REQUEST_ID_HEADER));

    depot.insert(REQUEST_ID_DEPOT_KEY, request_id.clone());

    request_ids::set_request_id_header(res, &request_id);

    let method = req.method().to_string();
    let path = req.uri().path().to_owned();
    let remote_addr = req.remote_addr().to_string();
    let names = spans::request_span_name(&method, &path);
    let otel_path = names.otel_path;
    let otel_span_name = names.otel_span_name;
    let _in_flight_request = metrics::InFlightRequestGuard::track();

    let span = tracing::info_span!(
        parent: None,
        "http.request",
        otel.name = %otel_span_name,
        otel.kind = "server",
        request_id = %request_id,
        method = %method,
        path = %path,
        remote_addr = %remote_addr,
        caller = tracing::field::Empty,
        status = tracing::field::Empty,
        duration_ms = tracing::field::Empty
    );

    if settings::otel_parent_propagation_enabled()
        && let Some(parent_context) = parent_context::extract_parent_context(req.headers())
        && let Err(source) = span.set_parent(parent_context)
    {
        warn!("failed to set parent context on request span: {source}");
    }

    ctrl.call_next(req, depot, res)
        .instrument(span.clone())
        .await;

    let caller = spans::caller_role(&depot.identity());
    let status = request_ids::response_status_or_ok(res.status_code);
    let elapsed = started.elapsed();

    metrics::observe_request(&method, &otel_path, status.as_u16(), elapsed.as_secs_f64());

    let outcome = Outcome {
        method: &method,
        path: &path,
        request_id: &request_id,
        caller,
        status,
        duration_ms: elapsed.as_millis(),
    };

    span.record("caller", caller);
    span.record("status", status.as_u16());
    span.record("duration_ms", outcome.duration_ms);

    span.in_scope(|| outcome.log(u128::from(settings::slow_request_threshold_ms())));
}

/// What the completion log lines report about a finished request.
struct Outcome<'a> {
    method: &'a str,
    path: &'a str,
    request_id: &'a str,
    caller: &'static str,
    status: StatusCode,
    duration_ms: u128,
}

impl Outcome<'_> {
    fn log(&self, slow_threshold_ms: u128) {
        let Self {
            method,
            path,
            request_id,
            caller,
            status,
            duration_ms,
        } = *self;

        info!(status = status.as_u16(), duration_ms, "request.completed");

        if status.is_server_error() {
            error!(
                status = status.as_u16(),
                method,
                path,
                request_id,
                caller,
                "server error response"
            );
        } else if status.is_client_error() {
            warn!(
                status = status.as_u16(),
                method,
                path,
                request_id,
                caller,
                "client error response"
            );
        }

        if duration_ms > slow_threshold_ms {
            warn!(
                method,
                path,
                request_id,
                duration_ms,
                slow_threshold_ms,
                "slow request detected"
            );
        }
    }
}
