use std::sync::Arc;

use tokio::net::TcpListener;

use nationalparks_rest::config::ServiceConfig;
use nationalparks_rest::db::MySqlStore;
use nationalparks_rest::http::HttpServer;
use nationalparks_rest::lifecycle::Shutdown;
use nationalparks_rest::observability::{logging, Telemetry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    tracing::info!("nationalparks-rest v0.1.0 starting");

    // Missing telemetry credentials abort startup here.
    let config = ServiceConfig::from_env()?;

    let telemetry = Telemetry::init(&config.telemetry)?;
    tracing::info!(
        service_name = %config.telemetry.service_name,
        environment = %config.telemetry.environment,
        "Telemetry initialized"
    );

    tracing::info!(
        host = %config.database.host,
        port = config.database.port,
        "Using MySQL instance"
    );
    let store = MySqlStore::connect(&config.database, telemetry.tracer()).await?;

    let listener = TcpListener::bind(config.http.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config.http.clone(), telemetry.tracer(), Arc::new(store));
    server.run(listener, shutdown.subscribe()).await?;

    // Connections have drained; flush buffered spans before exit.
    telemetry.shutdown()?;

    tracing::info!("Shutdown complete");
    Ok(())
}
