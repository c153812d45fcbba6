//! Route handlers.
//!
//! Every handler opens exactly one operation span under the request's
//! server span, records the parameters it parsed as span attributes, and
//! delegates to the store with the same context so query spans nest
//! correctly. The span is released when the handler returns, on success and
//! error paths alike.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Extension;
use opentelemetry::trace::TraceContextExt;
use opentelemetry::{Context, KeyValue};

use crate::db::{ParkCriteria, ParkFilter};
use crate::http::response::{respond_with_error, respond_with_success};
use crate::http::server::AppState;

const DEFAULT_START: i64 = 0;
const DEFAULT_COUNT: i64 = 5;

/// Pagination window parsed from query parameters.
///
/// Absent or malformed values silently fall back to the documented
/// defaults instead of failing the request. Worth revisiting whether a
/// malformed value should be a 400; the permissive fallback is the
/// documented contract for now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub start: i64,
    pub count: i64,
}

impl PageParams {
    pub fn from_query(query: &HashMap<String, String>) -> Self {
        Self {
            start: parse_or(query.get("start"), DEFAULT_START),
            count: parse_or(query.get("count"), DEFAULT_COUNT),
        }
    }
}

fn parse_or(raw: Option<&String>, default: i64) -> i64 {
    raw.and_then(|value| value.parse().ok()).unwrap_or(default)
}

fn non_empty(query: &HashMap<String, String>, key: &str) -> Option<String> {
    query.get(key).filter(|value| !value.is_empty()).cloned()
}

/// GET `/` and `/health-check`
pub async fn health_check(
    State(state): State<AppState>,
    Extension(parent_cx): Extension<Context>,
) -> Response {
    let cx = state.tracer.start_span(&parent_cx, "health_check");
    respond_with_success(&state.tracer, &cx, "API is up and running")
}

/// GET `/nationalpark/{id}`
pub async fn get_park_by_id(
    State(state): State<AppState>,
    Extension(parent_cx): Extension<Context>,
    Path(id): Path<String>,
) -> Response {
    let cx = state.tracer.start_span(&parent_cx, "get_park_by_id");

    // A malformed id falls back to 0 and reports as a store miss.
    let id: i32 = id.parse().unwrap_or(0);
    cx.span().set_attribute(KeyValue::new("id", id as i64));

    match state.store.fetch_one(&cx, ParkCriteria::ById(id)).await {
        Ok(park) => respond_with_success(&state.tracer, &cx, park),
        Err(err) => respond_with_error(&state.tracer, &cx, err.to_string()),
    }
}

/// GET `/nationalparks/name/{name}`
pub async fn get_park_by_name(
    State(state): State<AppState>,
    Extension(parent_cx): Extension<Context>,
    Path(name): Path<String>,
) -> Response {
    let cx = state.tracer.start_span(&parent_cx, "get_park_by_name");
    cx.span().set_attribute(KeyValue::new("name", name.clone()));

    match state.store.fetch_one(&cx, ParkCriteria::ByName(name)).await {
        Ok(park) => respond_with_success(&state.tracer, &cx, park),
        Err(err) => respond_with_error(&state.tracer, &cx, err.to_string()),
    }
}

/// GET `/nationalparks?city=&state=&zipcode=&start=&count=`
pub async fn list_parks(
    State(state): State<AppState>,
    Extension(parent_cx): Extension<Context>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let cx = state.tracer.start_span(&parent_cx, "list_parks");

    let filter = ParkFilter {
        city: non_empty(&query, "city"),
        state: non_empty(&query, "state"),
        zipcode: non_empty(&query, "zipcode"),
    };
    let page = PageParams::from_query(&query);
    record_list_attributes(&cx, &filter, page);

    match state
        .store
        .fetch_many(&cx, filter, page.start, page.count)
        .await
    {
        Ok(parks) => respond_with_success(&state.tracer, &cx, parks),
        Err(err) => respond_with_error(&state.tracer, &cx, err.to_string()),
    }
}

/// GET `/nationalparks/city/{city}?start=&count=`
pub async fn list_parks_by_city(
    State(state): State<AppState>,
    Extension(parent_cx): Extension<Context>,
    Path(city): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let cx = state.tracer.start_span(&parent_cx, "list_parks_by_city");

    let filter = ParkFilter {
        city: Some(city),
        ..Default::default()
    };
    let page = PageParams::from_query(&query);
    record_list_attributes(&cx, &filter, page);

    match state
        .store
        .fetch_many(&cx, filter, page.start, page.count)
        .await
    {
        Ok(parks) => respond_with_success(&state.tracer, &cx, parks),
        Err(err) => respond_with_error(&state.tracer, &cx, err.to_string()),
    }
}

/// GET `/nationalparks/state/{stateabbr}?start=&count=`
pub async fn list_parks_by_state(
    State(state): State<AppState>,
    Extension(parent_cx): Extension<Context>,
    Path(stateabbr): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let cx = state.tracer.start_span(&parent_cx, "list_parks_by_state");

    let filter = ParkFilter {
        state: Some(stateabbr),
        ..Default::default()
    };
    let page = PageParams::from_query(&query);
    record_list_attributes(&cx, &filter, page);

    match state
        .store
        .fetch_many(&cx, filter, page.start, page.count)
        .await
    {
        Ok(parks) => respond_with_success(&state.tracer, &cx, parks),
        Err(err) => respond_with_error(&state.tracer, &cx, err.to_string()),
    }
}

/// GET `/nationalparks/zipcode/{zipcode}?start=&count=`
///
/// The one structurally required identifier: a non-numeric zip code fails
/// the request instead of falling back.
pub async fn list_parks_by_zipcode(
    State(state): State<AppState>,
    Extension(parent_cx): Extension<Context>,
    Path(zipcode): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let cx = state.tracer.start_span(&parent_cx, "list_parks_by_zipcode");

    let zip: i32 = match zipcode.parse() {
        Ok(zip) => zip,
        Err(_) => {
            return respond_with_error(&state.tracer, &cx, format!("bad zip code: {zipcode}"));
        }
    };
    let filter = ParkFilter {
        zipcode: Some(zip.to_string()),
        ..Default::default()
    };
    let page = PageParams::from_query(&query);
    record_list_attributes(&cx, &filter, page);

    match state
        .store
        .fetch_many(&cx, filter, page.start, page.count)
        .await
    {
        Ok(parks) => respond_with_success(&state.tracer, &cx, parks),
        Err(err) => respond_with_error(&state.tracer, &cx, err.to_string()),
    }
}

fn record_list_attributes(cx: &Context, filter: &ParkFilter, page: PageParams) {
    let span = cx.span();
    if let Some(city) = &filter.city {
        span.set_attribute(KeyValue::new("city", city.clone()));
    }
    if let Some(state) = &filter.state {
        span.set_attribute(KeyValue::new("state", state.clone()));
    }
    if let Some(zipcode) = &filter.zipcode {
        span.set_attribute(KeyValue::new("zipcode", zipcode.clone()));
    }
    span.set_attribute(KeyValue::new("start", page.start));
    span.set_attribute(KeyValue::new("count", page.count));
}
