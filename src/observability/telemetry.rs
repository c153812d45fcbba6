//! Distributed tracing support.
//!
//! # Responsibilities
//! - Construct the OTLP span exporter and the process-wide tracer provider
//! - Create correctly parented spans for request handling
//! - Render trace identifiers into the `Server-Timing` response header
//!
//! # Design Decisions
//! - Always-on sampling: every span is recorded
//! - Batching exporter: the request path enqueues, a background thread ships
//! - W3C Trace Context is the propagation format, inbound and outbound
//! - The provider is an explicitly owned value with an init/shutdown
//!   lifecycle; handlers receive a cloned [`RequestTracer`], never a global

use std::collections::HashMap;
use std::sync::Arc;

use opentelemetry::trace::{SpanContext, SpanKind, TraceContextExt, Tracer, TracerProvider as _};
use opentelemetry::{global, Context, KeyValue};
use opentelemetry_otlp::{Protocol, WithExportConfig, WithHttpConfig};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{RandomIdGenerator, Sampler, SdkTracer, SdkTracerProvider};
use opentelemetry_sdk::Resource;
use opentelemetry_semantic_conventions as semconv;

use crate::config::TelemetryConfig;

/// Instrumentation scope under which all service spans are created.
pub const TRACER_NAME: &str = "nationalparks-rest";

/// Error type for telemetry setup and teardown.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The span exporter could not be constructed.
    #[error("failed to construct span exporter: {0}")]
    Exporter(#[from] opentelemetry_otlp::ExporterBuildError),

    /// Flushing or shutting down the provider failed.
    #[error("tracer provider shutdown failed: {0}")]
    Shutdown(#[from] opentelemetry_sdk::error::OTelSdkError),
}

/// Owner of the tracer provider for the lifetime of the process.
///
/// Constructed once at startup; [`Telemetry::shutdown`] must be called
/// exactly once at process exit to flush buffered spans synchronously.
pub struct Telemetry {
    provider: SdkTracerProvider,
    tracer: RequestTracer,
}

impl Telemetry {
    /// Initialize tracing against the Splunk ingest endpoint.
    ///
    /// Fails when the exporter cannot be constructed; the caller treats
    /// this as a fatal startup condition.
    pub fn init(config: &TelemetryConfig) -> Result<Self, TelemetryError> {
        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_http()
            .with_protocol(Protocol::HttpBinary)
            .with_endpoint(config.ingest_endpoint())
            .with_headers(HashMap::from([(
                "X-SF-Token".to_string(),
                config.access_token.clone(),
            )]))
            .build()?;

        Ok(Self::with_exporter(exporter, config))
    }

    /// Build the provider around an arbitrary exporter.
    ///
    /// Tests use this with an in-memory exporter; production goes through
    /// [`Telemetry::init`].
    pub fn with_exporter<E>(exporter: E, config: &TelemetryConfig) -> Self
    where
        E: opentelemetry_sdk::trace::SpanExporter + 'static,
    {
        global::set_text_map_propagator(TraceContextPropagator::new());

        let resource = Resource::builder()
            .with_service_name(config.service_name.clone())
            .with_attributes([KeyValue::new(
                semconv::resource::DEPLOYMENT_ENVIRONMENT_NAME,
                config.environment.clone(),
            )])
            .build();

        let provider = SdkTracerProvider::builder()
            .with_sampler(Sampler::AlwaysOn)
            .with_id_generator(RandomIdGenerator::default())
            .with_resource(resource)
            .with_batch_exporter(exporter)
            .build();

        let tracer = RequestTracer {
            tracer: Arc::new(provider.tracer(TRACER_NAME)),
        };

        Self { provider, tracer }
    }

    /// Handle for creating spans, cheap to clone into request state.
    pub fn tracer(&self) -> RequestTracer {
        self.tracer.clone()
    }

    /// Push all buffered spans to the exporter without shutting down.
    pub fn force_flush(&self) -> Result<(), TelemetryError> {
        self.provider.force_flush()?;
        Ok(())
    }

    /// Flush buffered spans and tear the provider down.
    ///
    /// Spans created after this call are dropped. Invoke exactly once, at
    /// process exit.
    pub fn shutdown(&self) -> Result<(), TelemetryError> {
        self.provider.shutdown()?;
        Ok(())
    }
}

/// Span factory shared by the handler layer and the data-access layer.
///
/// Wraps the SDK tracer for the service instrumentation scope. Spans are
/// carried in explicit [`Context`] values threaded through call chains, so
/// nested operations parent correctly without global lookups. A span is
/// sealed when its context goes out of scope, which guarantees release on
/// every exit path.
#[derive(Clone)]
pub struct RequestTracer {
    tracer: Arc<SdkTracer>,
}

impl RequestTracer {
    /// Start an internal child span under `parent`.
    ///
    /// Begins a new trace when the parent context carries no span.
    pub fn start_span(&self, parent: &Context, name: impl Into<std::borrow::Cow<'static, str>>) -> Context {
        let span = self
            .tracer
            .span_builder(name)
            .start_with_context(self.tracer.as_ref(), parent);
        parent.with_span(span)
    }

    /// Start the server-kind root span for an inbound request.
    pub fn start_server_span(
        &self,
        parent: &Context,
        name: impl Into<std::borrow::Cow<'static, str>>,
    ) -> Context {
        let span = self
            .tracer
            .span_builder(name)
            .with_kind(SpanKind::Server)
            .start_with_context(self.tracer.as_ref(), parent);
        parent.with_span(span)
    }
}

/// Render a span's identifiers as a `Server-Timing` header value.
///
/// Follows the W3C trace-context version-0 layout inside a `Server-Timing`
/// carrier so the value survives browser CORS restrictions. Must be called
/// once per request, for the outermost span only, immediately before the
/// response is written.
pub fn server_timing_value(span_context: &SpanContext) -> String {
    format!(
        "traceparent;desc=\"00-{}-{}-01\"",
        span_context.trace_id(),
        span_context.span_id()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::trace::{SpanId, TraceFlags, TraceId, TraceState};
    use opentelemetry_sdk::trace::InMemorySpanExporter;

    fn test_config() -> TelemetryConfig {
        TelemetryConfig {
            realm: "test".to_string(),
            access_token: "token".to_string(),
            service_name: "nationalparks-rest-test".to_string(),
            environment: "test".to_string(),
        }
    }

    fn test_telemetry() -> (Telemetry, InMemorySpanExporter) {
        let exporter = InMemorySpanExporter::default();
        let telemetry = Telemetry::with_exporter(exporter.clone(), &test_config());
        (telemetry, exporter)
    }

    #[test]
    fn test_server_timing_value_format() {
        let span_context = SpanContext::new(
            TraceId::from_hex("0af7651916cd43dd8448eb211c80319c").unwrap(),
            SpanId::from_hex("b7ad6b7169203331").unwrap(),
            TraceFlags::SAMPLED,
            false,
            TraceState::default(),
        );
        assert_eq!(
            server_timing_value(&span_context),
            "traceparent;desc=\"00-0af7651916cd43dd8448eb211c80319c-b7ad6b7169203331-01\""
        );
    }

    #[test]
    fn test_rendered_identifiers_are_fixed_width_hex() {
        let (telemetry, _exporter) = test_telemetry();
        let tracer = telemetry.tracer();

        for _ in 0..32 {
            let cx = tracer.start_span(&Context::new(), "probe");
            let value = server_timing_value(cx.span().span_context());

            let inner = value
                .strip_prefix("traceparent;desc=\"00-")
                .and_then(|rest| rest.strip_suffix("-01\""))
                .expect("unexpected header layout");
            let (trace_id, span_id) = inner.split_once('-').expect("missing separator");

            assert_eq!(trace_id.len(), 32);
            assert_eq!(span_id.len(), 16);
            assert!(trace_id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
            assert!(span_id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_unrelated_requests_get_distinct_traces() {
        let (telemetry, _exporter) = test_telemetry();
        let tracer = telemetry.tracer();

        let first = tracer.start_server_span(&Context::new(), "first");
        let second = tracer.start_server_span(&Context::new(), "second");

        assert_ne!(
            first.span().span_context().trace_id(),
            second.span().span_context().trace_id()
        );
    }

    #[test]
    fn test_child_span_shares_parent_trace_id() {
        let (telemetry, _exporter) = test_telemetry();
        let tracer = telemetry.tracer();

        let root = tracer.start_server_span(&Context::new(), "root");
        let child = tracer.start_span(&root, "child");

        assert_eq!(
            root.span().span_context().trace_id(),
            child.span().span_context().trace_id()
        );
        assert_ne!(
            root.span().span_context().span_id(),
            child.span().span_context().span_id()
        );
    }

    #[test]
    fn test_shutdown_flushes_and_then_rejects_spans() {
        let (telemetry, exporter) = test_telemetry();
        let tracer = telemetry.tracer();

        {
            let cx = tracer.start_span(&Context::new(), "before_shutdown");
            cx.span().end();
        }
        telemetry.force_flush().expect("flush failed");

        let delivered = exporter.get_finished_spans().expect("exporter poisoned");
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].name, "before_shutdown");

        telemetry.shutdown().expect("shutdown failed");

        // The provider is torn down; late spans must not reach the exporter.
        let baseline = exporter.get_finished_spans().expect("exporter poisoned").len();
        {
            let cx = tracer.start_span(&Context::new(), "after_shutdown");
            cx.span().end();
        }
        let after = exporter.get_finished_spans().expect("exporter poisoned").len();
        assert_eq!(after, baseline);
    }
}
