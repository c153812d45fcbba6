//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment
//!     → loader.rs (read & parse, once at startup)
//!     → ServiceConfig (validated, immutable)
//!     → shared with subsystems at construction time
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields default except telemetry credentials, which are required:
//!   a missing exporter credential aborts startup rather than producing a
//!   trace-less run
//! - Malformed numeric variables fall back to defaults with a warning

pub mod loader;
pub mod schema;

pub use loader::ConfigError;
pub use schema::{DatabaseConfig, HttpConfig, ServiceConfig, TelemetryConfig};
