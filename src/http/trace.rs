//! Per-request trace context middleware.
//!
//! # Responsibilities
//! - Continue the trace carried by an inbound `traceparent` header, or begin
//!   a fresh one
//! - Open the outermost server span for the request and hand the resulting
//!   context to the handler via request extensions
//! - Surface the trace back to the caller in the `Server-Timing` response
//!   header, exposed for cross-origin reads
//!
//! # Design Decisions
//! - The trace header describes the outermost span only; it is attached
//!   here, once, after the inner handler has run
//! - The span is ended on every path, before the response leaves the layer

use axum::extract::{MatchedPath, Request, State};
use axum::http::header::{HeaderName, HeaderValue, ACCESS_CONTROL_EXPOSE_HEADERS};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use opentelemetry::propagation::TextMapPropagator;
use opentelemetry::trace::{Status, TraceContextExt};
use opentelemetry::{Context, KeyValue};
use opentelemetry_http::HeaderExtractor;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_semantic_conventions as semconv;

use crate::http::server::AppState;
use crate::observability::telemetry::server_timing_value;

const SERVER_TIMING: HeaderName = HeaderName::from_static("server-timing");

/// Read the propagated W3C trace context from the inbound headers.
///
/// Yields a context without an active span when no valid `traceparent`
/// header is present, in which case the server span below starts a new
/// trace.
fn extract_parent_context(headers: &HeaderMap) -> Context {
    TraceContextPropagator::new().extract(&HeaderExtractor(headers))
}

/// Wrap one inbound request in the outermost server span.
pub async fn trace_context_layer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let parent_cx = extract_parent_context(request.headers());

    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let cx = state.tracer.start_server_span(&parent_cx, route);
    request.extensions_mut().insert(cx.clone());

    let mut response = next.run(request).await;

    let status = response.status();
    cx.span().set_attribute(KeyValue::new(
        semconv::trace::HTTP_RESPONSE_STATUS_CODE,
        status.as_u16() as i64,
    ));
    if status.is_server_error() {
        cx.span()
            .set_status(Status::error(format!("request failed with status {status}")));
    } else {
        cx.span().set_status(Status::Ok);
    }

    let header_value = server_timing_value(cx.span().span_context());
    response.headers_mut().insert(
        ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static("Server-Timing"),
    );
    if let Ok(value) = HeaderValue::from_str(&header_value) {
        response.headers_mut().insert(SERVER_TIMING, value);
    }

    cx.span().end();
    response
}
