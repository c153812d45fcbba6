//! MySQL implementation of the park store.

use async_trait::async_trait;
use opentelemetry::trace::{Status, TraceContextExt};
use opentelemetry::{Context, KeyValue};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};

use crate::config::DatabaseConfig;
use crate::db::store::{NationalPark, ParkCriteria, ParkFilter, ParkStore, StoreError};
use crate::observability::RequestTracer;

/// Column list with aliases matching the record's field names.
const COLUMNS: &str = "ID AS id, LOCATION_NUM AS location_num, LOCATION_NAME AS location_name, \
     ADDRESS AS address, CITY AS city, STATE AS state, ZIP_CODE AS zip_code, \
     PHONE_NUM AS phone_num, FAX_NUM AS fax_num, LATITUDE AS latitude, LONGITUDE AS longitude";

/// Park store backed by a MySQL connection pool.
pub struct MySqlStore {
    pool: MySqlPool,
    tracer: RequestTracer,
}

impl MySqlStore {
    /// Connect a pool against the configured MySQL instance.
    pub async fn connect(
        config: &DatabaseConfig,
        tracer: RequestTracer,
    ) -> Result<Self, StoreError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(10)
            .connect(&config.connection_url())
            .await?;

        tracing::info!(
            host = %config.host,
            port = config.port,
            database = %config.name,
            "Connected to MySQL"
        );

        Ok(Self { pool, tracer })
    }

    fn start_query_span(&self, parent: &Context, name: &'static str) -> Context {
        let cx = self.tracer.start_span(parent, name);
        cx.span()
            .set_attribute(KeyValue::new("db.system", "mysql"));
        cx
    }
}

#[async_trait]
impl ParkStore for MySqlStore {
    async fn fetch_one(
        &self,
        cx: &Context,
        criteria: ParkCriteria,
    ) -> Result<NationalPark, StoreError> {
        let cx = self.start_query_span(cx, "fetch_one");

        let result = match &criteria {
            ParkCriteria::ById(id) => {
                let sql = format!("SELECT {COLUMNS} FROM NATIONAL_PARKS WHERE ID = ?");
                sqlx::query_as::<_, NationalPark>(&sql)
                    .bind(*id)
                    .fetch_one(&self.pool)
                    .await
            }
            ParkCriteria::ByName(name) => {
                let sql = format!("SELECT {COLUMNS} FROM NATIONAL_PARKS WHERE LOCATION_NAME = ?");
                sqlx::query_as::<_, NationalPark>(&sql)
                    .bind(name.as_str())
                    .fetch_one(&self.pool)
                    .await
            }
        };

        match result {
            Ok(park) => Ok(park),
            Err(sqlx::Error::RowNotFound) => {
                cx.span().set_status(Status::error("no matching record found"));
                Err(StoreError::NotFound)
            }
            Err(err) => {
                cx.span().set_status(Status::error(err.to_string()));
                Err(err.into())
            }
        }
    }

    async fn fetch_many(
        &self,
        cx: &Context,
        filter: ParkFilter,
        start: i64,
        count: i64,
    ) -> Result<Vec<NationalPark>, StoreError> {
        let cx = self.start_query_span(cx, "fetch_many");

        // Absent filters widen to a match-everything pattern; city and state
        // compare lowercased on both sides.
        let city = filter.city.map(|c| c.to_lowercase()).unwrap_or_else(|| "%".to_string());
        let state = filter.state.map(|s| s.to_lowercase()).unwrap_or_else(|| "%".to_string());
        let zipcode = filter.zipcode.unwrap_or_else(|| "%".to_string());

        let sql = format!(
            "SELECT {COLUMNS} FROM NATIONAL_PARKS \
             WHERE LOWER(CITY) LIKE ? AND LOWER(STATE) LIKE ? AND ZIP_CODE LIKE ? \
             LIMIT ? OFFSET ?"
        );
        let rows = sqlx::query_as::<_, NationalPark>(&sql)
            .bind(city)
            .bind(state)
            .bind(zipcode)
            .bind(count)
            .bind(start)
            .fetch_all(&self.pool)
            .await;

        match rows {
            Ok(parks) => Ok(parks),
            Err(err) => {
                cx.span().set_status(Status::error(err.to_string()));
                Err(err.into())
            }
        }
    }
}
