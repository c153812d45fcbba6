//! Configuration loading from the process environment.

use std::env;
use std::str::FromStr;

use crate::config::schema::{DatabaseConfig, HttpConfig, ServiceConfig, TelemetryConfig};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("required environment variable {0} not set")]
    MissingVar(&'static str),
}

/// Read a variable, falling back to a default when unset.
fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Read and parse a numeric variable, falling back to a default when unset
/// or malformed. Malformed values are tolerated, matching the permissive
/// treatment of numeric request parameters elsewhere in the service.
fn env_parse_or<T: FromStr + Copy>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(variable = name, value = %raw, "Ignoring unparseable value, using default");
            default
        }),
        Err(_) => default,
    }
}

fn env_required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

impl ServiceConfig {
    /// Load configuration from the environment.
    ///
    /// Telemetry credentials are required; everything else defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = ServiceConfig::default();

        let http = HttpConfig {
            host: env_or("HTTPHOST", &defaults.http.host),
            port: env_parse_or("HTTPPORT", defaults.http.port),
            request_timeout_secs: defaults.http.request_timeout_secs,
        };

        let database = DatabaseConfig {
            host: env_or("DBHOST", &defaults.database.host),
            port: env_parse_or("DBPORT", defaults.database.port),
            user: env_or("DBUSER", &defaults.database.user),
            password: env_or("DBPASS", &defaults.database.password),
            name: env_or("DBNAME", &defaults.database.name),
        };

        let telemetry = TelemetryConfig {
            realm: env_required("SPLUNK_REALM")?,
            access_token: env_required("SPLUNK_ACCESS_TOKEN")?,
            service_name: env_or("SERVICE_NAME", "nationalparks-rest"),
            environment: env_or("ENVIRONMENT", "development"),
        };

        Ok(Self {
            http,
            database,
            telemetry,
        })
    }
}
