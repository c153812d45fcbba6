//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Load config → Init telemetry → Connect store → Bind listener → Serve
//!
//! Shutdown:
//!     Signal received → Stop accepting → Drain connections → Flush spans
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, including missing exporter
//!   credentials — there is no trace-less degraded mode
//! - The telemetry flush runs last, after the listener has drained

pub mod shutdown;

pub use shutdown::Shutdown;
