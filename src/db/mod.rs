//! Data-access subsystem.
//!
//! # Data Flow
//! ```text
//! handler (carries trace Context)
//!     → store.rs (ParkStore trait: fetch_one / fetch_many)
//!     → mysql.rs (parameterized queries, one child span per query)
//!     → MySQL
//! ```
//!
//! # Design Decisions
//! - Handlers depend on the `ParkStore` trait, not the MySQL driver, so
//!   tests can substitute an in-memory store
//! - Every store method takes the active trace context; query spans nest
//!   under the calling handler span
//! - Store errors are surfaced verbatim; no classification into HTTP codes

pub mod mysql;
pub mod store;

pub use mysql::MySqlStore;
pub use store::{NationalPark, ParkCriteria, ParkFilter, ParkStore, StoreError};
