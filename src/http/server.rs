//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (trace context, timeout, request logging)
//! - Bind the server to a listener and serve until shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::HttpConfig;
use crate::db::ParkStore;
use crate::http::{handlers, trace};
use crate::observability::RequestTracer;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Data-access capability behind the trait seam.
    pub store: Arc<dyn ParkStore>,

    /// Span factory for this request-handling process.
    pub tracer: RequestTracer,
}

/// HTTP server for the REST facade.
pub struct HttpServer {
    router: Router,
    config: HttpConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: HttpConfig, tracer: RequestTracer, store: Arc<dyn ParkStore>) -> Self {
        let state = AppState { store, tracer };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &HttpConfig, state: AppState) -> Router {
        let api = Router::new()
            .route("/", get(handlers::health_check))
            .route("/health-check", get(handlers::health_check))
            .route("/nationalpark/{id}", get(handlers::get_park_by_id))
            .route("/nationalparks", get(handlers::list_parks))
            .route("/nationalparks/name/{name}", get(handlers::get_park_by_name))
            .route("/nationalparks/city/{city}", get(handlers::list_parks_by_city))
            .route(
                "/nationalparks/state/{stateabbr}",
                get(handlers::list_parks_by_state),
            )
            .route(
                "/nationalparks/zipcode/{zipcode}",
                get(handlers::list_parks_by_zipcode),
            );

        Router::new()
            .nest("/api/v1", api)
            .layer(middleware::from_fn_with_state(
                state.clone(),
                trace::trace_context_layer,
            ))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.request_timeout_secs,
            )))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Returns once the shutdown signal fires and in-flight connections
    /// have drained.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }
}

/// Wait for Ctrl+C or a shutdown broadcast.
async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.expect("Failed to install Ctrl+C handler");
            tracing::info!("Ctrl+C received");
        }
        _ = shutdown.recv() => {
            tracing::info!("Shutdown signal received");
        }
    }
}
