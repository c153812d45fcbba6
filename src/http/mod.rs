//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, routing, timeout)
//!     → trace.rs (open outermost span, propagate context)
//!     → handlers.rs (operation span, parameter extraction, store call)
//!     → response.rs (serialize success or error, close out)
//!     → Send to client (with Server-Timing trace header)
//! ```

pub mod handlers;
pub mod response;
pub mod server;
pub mod trace;

pub use server::{AppState, HttpServer};
