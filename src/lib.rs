//! National Parks REST facade
//!
//! A read-only REST API over a table of national-park point-of-interest
//! records, built with Tokio and Axum and traced end to end with
//! OpenTelemetry.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌────────────────────────────────────────────────┐
//!                    │                 NATIONALPARKS-REST              │
//!                    │                                                 │
//!   Client Request   │  ┌─────────┐   ┌───────────┐   ┌────────────┐  │
//!   ─────────────────┼─▶│  http   │──▶│ http      │──▶│    db      │──┼──▶ MySQL
//!                    │  │ trace   │   │ handlers  │   │  store     │  │
//!                    │  └────┬────┘   └─────┬─────┘   └─────┬──────┘  │
//!                    │       │              │               │         │
//!                    │       ▼              ▼               ▼         │
//!                    │  ┌──────────────────────────────────────────┐  │
//!                    │  │     observability (span factory,          │  │
//!                    │  │     batching exporter, Server-Timing)     │──┼──▶ Trace
//!                    │  └──────────────────────────────────────────┘  │    Backend
//!                    │                                                 │
//!                    │  ┌─────────┐                   ┌────────────┐  │
//!                    │  │ config  │                   │ lifecycle  │  │
//!                    │  └─────────┘                   └────────────┘  │
//!                    └────────────────────────────────────────────────┘
//! ```
//!
//! Every inbound request is wrapped in a server span (continuing the trace
//! from an inbound `traceparent` header when present); each logical
//! operation — route handling, data access, response serialization — runs
//! under its own child span, and the trace identifiers are surfaced back to
//! the caller in a `Server-Timing` response header.

// Core subsystems
pub mod config;
pub mod db;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
