//! W3C trace context carried by incoming requests.

use opentelemetry::{Context, global, propagation::Extractor, trace::TraceContextExt as _};
use salvo::http::{HeaderMap, HeaderName};

struct RequestHeaders<'a>(&'a HeaderMap);

impl Extractor for RequestHeaders<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(HeaderName::as_str).collect()
    }
}

/// Remote parent named by the request headers, when it is a valid span context.
///
/// Extraction starts from an empty context so requests without trace headers
/// never attach to whatever span happens to be current.
pub(super) fn extract_parent_context(headers: &HeaderMap) -> Option<Context> {
    global::get_text_map_propagator(|propagator| {
        let context = propagator.extract_with_context(&Context::new(), &RequestHeaders(headers));
        let valid = context.span().span_context().is_valid();

        valid.then_some(context)
    })
}

#[cfg(test)]
mod tests {
    use opentelemetry_sdk::propagation::TraceContextPropagator;
    use salvo::http::HeaderValue;

    use super::*;

    const TRACEPARENT: &str = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";

    fn headers(traceparent: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("traceparent", HeaderValue::from_static(traceparent));
        headers
    }

    #[test]
    fn valid_traceparent_becomes_the_parent() {
        global::set_text_map_propagator(TraceContextPropagator::new());

        let parent = extract_parent_context(&headers(TRACEPARENT));

        let trace_id = parent.map(|context| context.span().span_context().trace_id().to_string());

        assert_eq!(
            trace_id.as_deref(),
            Some("4bf92f3577b34da6a3ce929d0e0e4736"),
            "trace id should come from the header"
        );
    }

    #[test]
    fn missing_or_malformed_headers_have_no_parent() {
        global::set_text_map_propagator(TraceContextPropagator::new());

        assert!(
            extract_parent_context(&HeaderMap::new()).is_none(),
            "no headers, no parent"
        );
        assert!(
            extract_parent_context(&headers("00-not-a-trace")).is_none(),
            "malformed header, no parent"
        );
    }
}
