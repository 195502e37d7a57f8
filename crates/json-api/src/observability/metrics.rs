//! Prometheus metrics collection and exposition endpoint.

use std::sync::OnceLock;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder, core::Collector,
};
use salvo::{
    Request, Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use storefront_app::domain::orders::models::OrderStatus;
use tracing::error;

#[derive(Debug)]
struct StorefrontMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
    orders_created_total: IntCounter,
    order_status_changes_total: IntCounterVec,
    orders_deleted_total: IntCounter,
    orders_rejected_total: IntCounterVec,
}

static METRICS: OnceLock<Option<StorefrontMetrics>> = OnceLock::new();

/// Order lifecycle outcome worth counting.
#[derive(Debug, Clone, Copy)]
pub(crate) enum OrderEvent {
    Created,
    StatusChanged(OrderStatus),
    Deleted,
    /// Checkout refused; the label names the reason.
    Rejected(&'static str),
}

#[derive(Debug)]
pub(super) struct InFlightRequestGuard {
    tracked: bool,
}

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        if let Some(metrics) = metrics() {
            metrics.requests_in_flight.inc();
            return Self { tracked: true };
        }

        Self { tracked: false }
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if self.tracked
            && let Some(metrics) = metrics()
        {
            metrics.requests_in_flight.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    let Some(metrics) = metrics() else {
        return;
    };

    let status_class = status_class(status_code);
    let status_code = status_code.to_string();

    metrics
        .requests_total
        .with_label_values(&[method, route, status_class, status_code.as_str()])
        .inc();

    metrics
        .request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

pub(crate) fn record_order_event(event: OrderEvent) {
    let Some(metrics) = metrics() else {
        return;
    };

    match event {
        OrderEvent::Created => metrics.orders_created_total.inc(),
        OrderEvent::StatusChanged(status) => metrics
            .order_status_changes_total
            .with_label_values(&[status.as_str()])
            .inc(),
        OrderEvent::Deleted => metrics.orders_deleted_total.inc(),
        OrderEvent::Rejected(reason) => metrics
            .orders_rejected_total
            .with_label_values(&[reason])
            .inc(),
    }
}

#[handler]
pub(crate) async fn metrics_handler(_req: &mut Request, res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        return;
    };

    let encoder = TextEncoder::new();
    let metric_families = metrics.registry.gather();

    let mut encoded = Vec::new();

    if let Err(source) = encoder.encode(&metric_families, &mut encoded) {
        error!("failed to encode metrics response: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    let content_type = match HeaderValue::from_str(encoder.format_type()) {
        Ok(value) => value,
        Err(source) => {
            error!("failed to encode metrics content type header: {source}");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

            return;
        }
    };

    res.headers_mut().insert(CONTENT_TYPE, content_type);
    res.render(String::from_utf8_lossy(&encoded).into_owned());
}

fn metrics() -> Option<&'static StorefrontMetrics> {
    METRICS.get_or_init(build_metrics).as_ref()
}

/// Register a freshly built collector, logging why it could not be.
fn register<M>(registry: &Registry, name: &str, metric: prometheus::Result<M>) -> Option<M>
where
    M: Collector + Clone + 'static,
{
    let metric = match metric {
        Ok(metric) => metric,
        Err(source) => {
            error!("failed to create {name} metric: {source}");
            return None;
        }
    };

    if let Err(source) = registry.register(Box::new(metric.clone())) {
        error!("failed to register {name} metric: {source}");
        return None;
    }

    Some(metric)
}

fn build_metrics() -> Option<StorefrontMetrics> {
    let registry = Registry::new();

    let requests_total = register(
        &registry,
        "requests_total",
        IntCounterVec::new(
            Opts::new(
                "storefront_json_http_requests_total",
                "Total HTTP requests partitioned by method, route, status class, and status code.",
            ),
            &["method", "route", "status_class", "status_code"],
        ),
    )?;

    let request_duration_seconds = register(
        &registry,
        "request_duration",
        HistogramVec::new(
            HistogramOpts::new(
                "storefront_json_http_request_duration_seconds",
                "HTTP request duration in seconds partitioned by method and route.",
            )
            .buckets(vec![
                0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "route"],
        ),
    )?;

    let requests_in_flight = register(
        &registry,
        "in-flight gauge",
        IntGauge::with_opts(Opts::new(
            "storefront_json_http_requests_in_flight",
            "Current number of in-flight HTTP requests.",
        )),
    )?;

    let orders_created_total = register(
        &registry,
        "orders_created",
        IntCounter::with_opts(Opts::new(
            "storefront_json_orders_created_total",
            "Orders placed successfully.",
        )),
    )?;

    let order_status_changes_total = register(
        &registry,
        "order_status_changes",
        IntCounterVec::new(
            Opts::new(
                "storefront_json_order_status_changes_total",
                "Admin order status updates partitioned by target status.",
            ),
            &["status"],
        ),
    )?;

    let orders_deleted_total = register(
        &registry,
        "orders_deleted",
        IntCounter::with_opts(Opts::new(
            "storefront_json_orders_deleted_total",
            "Orders removed by administrators.",
        )),
    )?;

    let orders_rejected_total = register(
        &registry,
        "orders_rejected",
        IntCounterVec::new(
            Opts::new(
                "storefront_json_orders_rejected_total",
                "Checkouts refused partitioned by reason.",
            ),
            &["reason"],
        ),
    )?;

    Some(StorefrontMetrics {
        registry,
        requests_total,
        request_duration_seconds,
        requests_in_flight,
        orders_created_total,
        order_status_changes_total,
        orders_deleted_total,
        orders_rejected_total,
    })
}

fn status_class(status_code: u16) -> &'static str {
    match status_code {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use salvo::{
        Router, Service,
        test::{ResponseExt, TestClient},
    };
    use storefront_app::domain::orders::models::OrderStatus;

    use super::{OrderEvent, metrics_handler, observe_request, record_order_event, status_class};

    #[tokio::test]
    async fn metrics_endpoint_exposes_http_and_order_metrics() {
        observe_request("GET", "/products", 200, 0.042);
        observe_request("POST", "/orders", 400, 0.123);
        record_order_event(OrderEvent::Created);
        record_order_event(OrderEvent::StatusChanged(OrderStatus::Cancelled));
        record_order_event(OrderEvent::Rejected("insufficient_stock"));

        let service =
            Service::new(Router::new().push(Router::with_path("metrics").get(metrics_handler)));

        let response_result = TestClient::get("http://example.com/metrics")
            .send(&service)
            .await
            .take_string()
            .await;

        let response: String = response_result.unwrap_or_default();

        for name in [
            "storefront_json_http_requests_total",
            "storefront_json_http_request_duration_seconds",
            "storefront_json_http_requests_in_flight",
            "storefront_json_orders_created_total",
            "storefront_json_order_status_changes_total{status=\"cancelled\"}",
            "storefront_json_orders_rejected_total{reason=\"insufficient_stock\"}",
        ] {
            assert!(response.contains(name), "expected {name} in metrics response");
        }
    }

    #[test]
    fn status_classes_cover_every_range() {
        assert_eq!(status_class(201), "2xx");
        assert_eq!(status_class(404), "4xx");
        assert_eq!(status_class(503), "5xx");
        assert_eq!(status_class(700), "other");
    }
}
