//! Record model and the data-access trait.

use async_trait::async_trait;
use opentelemetry::Context;
use serde::{Deserialize, Serialize};

/// One national-park point-of-interest record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct NationalPark {
    pub id: i32,
    pub location_num: String,
    pub location_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: i32,
    pub phone_num: String,
    pub fax_num: String,
    pub latitude: f32,
    pub longitude: f32,
}

/// Lookup criteria for a single record.
#[derive(Debug, Clone)]
pub enum ParkCriteria {
    ById(i32),
    ByName(String),
}

/// Optional column filters for list queries.
///
/// City and state match case-insensitively; an absent field matches every
/// record.
#[derive(Debug, Clone, Default)]
pub struct ParkFilter {
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
}

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record matched the supplied criteria.
    #[error("no matching record found")]
    NotFound,

    /// Underlying database failure, surfaced verbatim.
    #[error("{0}")]
    Database(#[from] sqlx::Error),
}

/// Read-only access to the park table.
///
/// Both methods take the active trace context so any spans the
/// implementation opens nest under the calling handler span.
#[async_trait]
pub trait ParkStore: Send + Sync {
    /// Fetch the single record matching `criteria`.
    async fn fetch_one(
        &self,
        cx: &Context,
        criteria: ParkCriteria,
    ) -> Result<NationalPark, StoreError>;

    /// Fetch up to `count` records matching `filter`, skipping `start`.
    async fn fetch_many(
        &self,
        cx: &Context,
        filter: ParkFilter,
        start: i64,
        count: i64,
    ) -> Result<Vec<NationalPark>, StoreError>;
}
