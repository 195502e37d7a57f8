//! Subscriber installation and tracer provider lifecycle.

use opentelemetry::{global, trace::TracerProvider as _};
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace::SdkTracerProvider};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Registry,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{ServerConfig, observability::LogFormat};

use super::{ObservabilityError, otel, settings};

/// Dependencies whose info-level chatter drowns out request logs.
const QUIET_TARGETS: [&str; 5] = ["sqlx", "h2", "hyper", "tonic", "opentelemetry"];

/// Installed logging and, when enabled, the OTLP tracer provider.
#[derive(Debug)]
pub(crate) struct Observability {
    tracer_provider: Option<SdkTracerProvider>,
}

impl Observability {
    /// Install the global subscriber for the configured log format.
    pub(crate) fn init(config: &ServerConfig) -> Result<Self, ObservabilityError> {
        settings::apply_runtime_config(config);

        let observability = &config.observability;

        let tracer_provider = observability
            .otel_enabled
            .then(|| {
                global::set_text_map_propagator(TraceContextPropagator::new());
                otel::build_tracer_provider(config)
            })
            .transpose()?;

        let filter = EnvFilter::new(filter_directives(&config.logging.log_level));

        match config.logging.log_format {
            LogFormat::Compact => install(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
                filter,
                tracer_provider.as_ref(),
                &observability.otel_service_name,
            )?,
            LogFormat::Json => install(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_target(true),
                filter,
                tracer_provider.as_ref(),
                &observability.otel_service_name,
            )?,
        }

        info!(
            service = %observability.otel_service_name,
            otel_enabled = observability.otel_enabled,
            "logging initialised"
        );

        Ok(Self { tracer_provider })
    }

    /// Flush buffered spans before the process exits.
    pub(crate) fn shutdown(self) {
        let Some(provider) = self.tracer_provider else {
            return;
        };

        match provider.shutdown() {
            Ok(()) => info!("tracer provider flushed"),
            Err(source) => error!("failed to shutdown tracer provider: {source}"),
        }
    }
}

fn filter_directives(log_level: &str) -> String {
    QUIET_TARGETS
        .iter()
        .fold(log_level.to_owned(), |mut directives, target| {
            directives.push(',');
            directives.push_str(target);
            directives.push_str("=warn");
            directives
        })
}

fn install<L>(
    fmt_layer: L,
    filter: EnvFilter,
    tracer_provider: Option<&SdkTracerProvider>,
    service_name: &str,
) -> Result<(), ObservabilityError>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    let subscriber = tracing_subscriber::registry().with(fmt_layer).with(filter);

    match tracer_provider {
        Some(provider) => subscriber
            .with(tracing_opentelemetry::layer().with_tracer(provider.tracer(service_name.to_owned())))
            .try_init()?,
        None => subscriber.try_init()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_targets_follow_the_base_level() {
        assert_eq!(
            filter_directives("debug"),
            "debug,sqlx=warn,h2=warn,hyper=warn,tonic=warn,opentelemetry=warn"
        );
    }

    #[test]
    fn per_target_levels_are_preserved() {
        assert!(
            filter_directives("info,storefront_json=trace")
                .starts_with("info,storefront_json=trace,sqlx=warn"),
            "caller-supplied directives come first"
        );
    }
}
