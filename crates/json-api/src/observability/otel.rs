//! OpenTelemetry tracer provider setup.

use std::time::Duration;

use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    trace::{RandomIdGenerator, Sampler, SdkTracerProvider},
};

use crate::config::ServerConfig;

use super::ObservabilityError;

pub(super) fn build_tracer_provider(
    config: &ServerConfig,
) -> Result<SdkTracerProvider, ObservabilityError> {
    let observability = &config.observability;

    let resource = Resource::builder_empty()
        .with_service_name(observability.otel_service_name.clone())
        .with_attributes([
            KeyValue::new("service.version", observability.otel_service_version.clone()),
            KeyValue::new(
                "deployment.environment.name",
                observability.otel_deployment_environment.clone(),
            ),
        ])
        .build();

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(observability.otel_exporter_otlp_endpoint.clone())
        .with_timeout(Duration::from_secs(
            observability.otel_exporter_otlp_timeout_seconds,
        ))
        .build()?;

    Ok(SdkTracerProvider::builder()
        .with_sampler(Sampler::ParentBased(Box::new(Sampler::TraceIdRatioBased(
            clamp_sample_ratio(observability.otel_trace_sample_ratio),
        ))))
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource)
        .with_batch_exporter(exporter)
        .build())
}

fn clamp_sample_ratio(sample_ratio: f64) -> f64 {
    sample_ratio.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::clamp_sample_ratio;

    #[test]
    fn sample_ratio_is_clamped_to_unit_interval() {
        assert!((clamp_sample_ratio(-0.5) - 0.0).abs() < f64::EPSILON, "negative ratio");
        assert!((clamp_sample_ratio(0.25) - 0.25).abs() < f64::EPSILON, "ratio in range");
        assert!((clamp_sample_ratio(7.0) - 1.0).abs() < f64::EPSILON, "ratio above one");
    }
}
