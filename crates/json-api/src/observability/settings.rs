//! Request logging settings shared by every worker.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::config::{ServerConfig, observability::ObservabilityConfig};

static SLOW_REQUEST_THRESHOLD_MS: AtomicU64 = AtomicU64::new(1_000);
static PARENT_PROPAGATION: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RequestLogSettings {
    slow_request_threshold_ms: u64,
    parent_propagation: bool,
}

impl From<&ObservabilityConfig> for RequestLogSettings {
    fn from(config: &ObservabilityConfig) -> Self {
        Self {
            slow_request_threshold_ms: config.slow_request_threshold_ms,
            // A remote parent is meaningless when spans are never exported.
            parent_propagation: config.otel_enabled && config.otel_parent_propagation_enabled,
        }
    }
}

pub(super) fn apply_runtime_config(config: &ServerConfig) {
    let settings = RequestLogSettings::from(&config.observability);

    SLOW_REQUEST_THRESHOLD_MS.store(settings.slow_request_threshold_ms, Ordering::Relaxed);
    PARENT_PROPAGATION.store(settings.parent_propagation, Ordering::Relaxed);
}

pub(super) fn slow_request_threshold_ms() -> u64 {
    SLOW_REQUEST_THRESHOLD_MS.load(Ordering::Relaxed)
}

pub(super) fn otel_parent_propagation_enabled() -> bool {
    PARENT_PROPAGATION.load(Ordering::Relaxed)
}
