//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use opentelemetry::Context;
use opentelemetry_sdk::trace::InMemorySpanExporter;
use tokio::net::TcpListener;

use nationalparks_rest::config::{HttpConfig, TelemetryConfig};
use nationalparks_rest::db::{NationalPark, ParkCriteria, ParkFilter, ParkStore, StoreError};
use nationalparks_rest::http::HttpServer;
use nationalparks_rest::lifecycle::Shutdown;
use nationalparks_rest::observability::Telemetry;

/// Build one record with the fields the tests care about.
pub fn park(id: i32, name: &str, city: &str, state: &str, zip: i32) -> NationalPark {
    NationalPark {
        id,
        location_num: format!("NP-{id:03}"),
        location_name: name.to_string(),
        address: "1 Park Road".to_string(),
        city: city.to_string(),
        state: state.to_string(),
        zip_code: zip,
        phone_num: "303-555-0100".to_string(),
        fax_num: String::new(),
        latitude: 39.7,
        longitude: -104.9,
    }
}

/// Fixture data: three Denver records in mixed case, two elsewhere.
pub fn sample_parks() -> Vec<NationalPark> {
    vec![
        park(1, "Rocky Mountain", "Denver", "CO", 80202),
        park(2, "Mile High Gardens", "DENVER", "CO", 80014),
        park(3, "Front Range Reserve", "denver", "CO", 80220),
        park(4, "Gateway Arch", "St. Louis", "MO", 63102),
        park(5, "Acadia", "Bar Harbor", "ME", 4609),
    ]
}

/// In-memory stand-in for the MySQL store.
pub struct FakeStore {
    parks: Vec<NationalPark>,
}

impl FakeStore {
    pub fn new(parks: Vec<NationalPark>) -> Self {
        Self { parks }
    }
}

#[async_trait]
impl ParkStore for FakeStore {
    async fn fetch_one(
        &self,
        _cx: &Context,
        criteria: ParkCriteria,
    ) -> Result<NationalPark, StoreError> {
        let found = match criteria {
            ParkCriteria::ById(id) => self.parks.iter().find(|p| p.id == id),
            ParkCriteria::ByName(name) => {
                self.parks.iter().find(|p| p.location_name == name)
            }
        };
        found.cloned().ok_or(StoreError::NotFound)
    }

    async fn fetch_many(
        &self,
        _cx: &Context,
        filter: ParkFilter,
        start: i64,
        count: i64,
    ) -> Result<Vec<NationalPark>, StoreError> {
        let matches = |p: &&NationalPark| {
            filter
                .city
                .as_ref()
                .map_or(true, |city| p.city.eq_ignore_ascii_case(city))
                && filter
                    .state
                    .as_ref()
                    .map_or(true, |state| p.state.eq_ignore_ascii_case(state))
                && filter
                    .zipcode
                    .as_ref()
                    .map_or(true, |zip| p.zip_code.to_string() == *zip)
        };
        Ok(self
            .parks
            .iter()
            .filter(matches)
            .skip(start as usize)
            .take(count as usize)
            .cloned()
            .collect())
    }
}

/// A running service instance wired to an in-memory span exporter.
pub struct TestService {
    pub addr: SocketAddr,
    pub exporter: InMemorySpanExporter,
    pub telemetry: Telemetry,
    pub shutdown: Shutdown,
}

impl TestService {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Spawn the full server on an ephemeral port with the fixture store.
pub async fn start_service() -> TestService {
    let exporter = InMemorySpanExporter::default();
    let telemetry = Telemetry::with_exporter(
        exporter.clone(),
        &TelemetryConfig {
            realm: "test".to_string(),
            access_token: "token".to_string(),
            service_name: "nationalparks-rest-test".to_string(),
            environment: "test".to_string(),
        },
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(
        HttpConfig::default(),
        telemetry.tracer(),
        Arc::new(FakeStore::new(sample_parks())),
    );
    let receiver = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, receiver).await;
    });

    TestService {
        addr,
        exporter,
        telemetry,
        shutdown,
    }
}

/// Split a `Server-Timing` value into its trace id and span id, asserting
/// the fixed layout on the way.
#[allow(dead_code)]
pub fn parse_server_timing(value: &str) -> (String, String) {
    let inner = value
        .strip_prefix("traceparent;desc=\"00-")
        .and_then(|rest| rest.strip_suffix("-01\""))
        .expect("unexpected Server-Timing layout");
    let (trace_id, span_id) = inner.split_once('-').expect("missing separator");

    assert_eq!(trace_id.len(), 32);
    assert_eq!(span_id.len(), 16);
    for c in trace_id.chars().chain(span_id.chars()) {
        assert!(c.is_ascii_hexdigit() && !c.is_ascii_uppercase());
    }

    (trace_id.to_string(), span_id.to_string())
}

/// HTTP client configured for direct local connections.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
