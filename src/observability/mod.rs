//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! request handling produces:
//!     → logging.rs (structured log events to stdout)
//!     → telemetry.rs (spans, batched and exported over OTLP)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Trace backend (Splunk Observability Cloud ingest)
//! ```
//!
//! # Design Decisions
//! - Every span is recorded (always-on sampling, no statistical sampling)
//! - Export is batched and asynchronous; the request path only enqueues
//! - The provider is owned by `main` and flushed exactly once at shutdown
//! - Trace context travels as an explicit `Context` value through every
//!   function that may create child spans, never via a hidden lookup

pub mod logging;
pub mod telemetry;

pub use telemetry::{RequestTracer, Telemetry, TelemetryError};
