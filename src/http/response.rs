//! Response serialization helpers.
//!
//! # Responsibilities
//! - Serialize the success payload as the entire JSON response body
//! - Serialize the error message as a JSON string body
//! - Record a serialization child span and mark the handler span on error
//!
//! # Design Decisions
//! - Exactly two outcomes: 200 with the data, 500 with the error text;
//!   error causes are never classified into distinct status codes

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use opentelemetry::trace::{Status, TraceContextExt};
use opentelemetry::Context;
use serde::Serialize;

use crate::observability::RequestTracer;

/// Serialize `data` as the whole response body with HTTP 200.
pub fn respond_with_success<T: Serialize>(
    tracer: &RequestTracer,
    cx: &Context,
    data: T,
) -> Response {
    let _cx = tracer.start_span(cx, "respond_with_success");
    (StatusCode::OK, Json(data)).into_response()
}

/// Serialize the error text as a JSON string body with HTTP 500.
///
/// The handler span is marked failed with the same description.
pub fn respond_with_error(tracer: &RequestTracer, cx: &Context, message: String) -> Response {
    cx.span().set_status(Status::error(message.clone()));
    let _cx = tracer.start_span(cx, "respond_with_error");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(message)).into_response()
}
